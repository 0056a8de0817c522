//! Contender example suite.
//!
//! Races a few ways of joining strings and checks every contestant for
//! correctness along the way, so a fast-but-wrong implementation is demoted
//! instead of winning.
//!
//! Run with:
//!   cargo run --example showdown
//!   RUST_LOG=contender=debug cargo run --example showdown

use contender::prelude::*;
use contender::render::Console;

fn registry() -> Registry {
    let mut registry = Registry::new();

    registry.function("join_format", ["parts", "sep"], |_capture, args| {
        let (Some(Value::List(parts)), Some(Value::Str(sep))) = (args.first(), args.get(1)) else {
            return Err(Thrown::new("TypeError", "join_format needs parts and sep"));
        };
        let mut joined = String::new();
        for (index, part) in parts.iter().enumerate() {
            let Value::Str(text) = part else {
                return Err(Thrown::new("TypeError", "parts must be strings"));
            };
            if index == 0 {
                joined = format!("{text}");
            } else {
                joined = format!("{joined}{sep}{text}");
            }
        }
        Ok(Value::Str(joined))
    });

    registry.function("join_push", ["parts", "sep"], |_capture, args| {
        let (Some(Value::List(parts)), Some(Value::Str(sep))) = (args.first(), args.get(1)) else {
            return Err(Thrown::new("TypeError", "join_push needs parts and sep"));
        };
        let mut joined = String::new();
        for (index, part) in parts.iter().enumerate() {
            let Value::Str(text) = part else {
                return Err(Thrown::new("TypeError", "parts must be strings"));
            };
            if index > 0 {
                joined.push_str(sep);
            }
            joined.push_str(text);
        }
        Ok(Value::Str(joined))
    });

    // Deliberately broken contestant: drops the separator.
    registry.function("join_concat", ["parts"], |_capture, args| {
        let Some(Value::List(parts)) = args.first() else {
            return Err(Thrown::new("TypeError", "join_concat needs parts"));
        };
        let mut joined = String::new();
        for part in parts {
            if let Value::Str(text) = part {
                joined.push_str(text);
            }
        }
        Ok(Value::Str(joined))
    });

    // A stateful contestant constructed per call from the group's
    // construct-scope arguments.
    registry
        .ty::<String>("Prefixer")
        .constructor(["prefix"], |args| match args.first() {
            Some(Value::Str(prefix)) => prefix.clone(),
            _ => String::new(),
        })
        .method("invoke", ["partial"], |prefix, _capture, args| {
            let Some(Value::Map(partial)) = args.first() else {
                return Err(Thrown::new("TypeError", "no partial outcome"));
            };
            let Some(Value::Str(previous)) = partial.get("return") else {
                return Err(Thrown::new("TypeError", "previous stage returned no string"));
            };
            Ok(Value::Str(format!("{prefix}{previous}")))
        })
        .register();

    registry
}

fn parts() -> Value {
    Value::List(
        ["alpha", "beta", "gamma", "delta"]
            .into_iter()
            .map(Value::from)
            .collect(),
    )
}

fn suite() -> Suite {
    let expect_joined = || Some(Expectation::new().returns("alpha,beta,gamma,delta"));

    Suite::new("String joining showdown")
        .comment("Compares joining strategies under identical inputs; wrong answers lose.")
        .registry(registry())
        .group(
            Group::new("Flat joins")
                .comment("Four parts, comma separator.")
                .iterations(50)
                .arg("parts", parts())
                .arg("sep", ",")
                .test("format! chain", expect_joined(), ["join_format"])
                .test("push_str", expect_joined(), ["join_push"])
                .test("concat (broken)", expect_joined(), ["join_concat"])
                .test("no contestant", expect_joined(), Vec::<Callback>::new()),
        )
        .group(
            Group::new("Prefixed joins")
                .comment("Same joins piped through a constructed prefixer.")
                .iterations(20)
                .arg("parts", parts())
                .arg("sep", ",")
                .construct_arg("prefix", "> ")
                .test(
                    "push_str",
                    Some(Expectation::new().returns("> alpha,beta,gamma,delta")),
                    ["join_push", "Prefixer"],
                )
                .test(
                    "format! chain",
                    Some(Expectation::new().returns("> alpha,beta,gamma,delta")),
                    ["join_format", "Prefixer"],
                ),
        )
        .group(
            Group::new("Warmup")
                .comment("Primes caches; results ignored.")
                .ignore_results()
                .iterations(5)
                .arg("parts", parts())
                .arg("sep", ",")
                .test("push_str", None, ["join_push"]),
        )
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "contender=info".into()),
        )
        .init();

    let config = RunConfig::discover().unwrap_or_default();
    let mut renderer = Console::new();

    if let Err(error) = suite().run(&config, &mut renderer) {
        eprintln!("benchmark aborted: {error:#}");
        std::process::exit(1);
    }
}
