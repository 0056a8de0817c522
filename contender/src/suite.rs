//! Suites, groups and test cases.
//!
//! A [`Suite`] owns the callback registry and an ordered list of [`Group`]s;
//! each group owns its test cases plus the named-argument tables every stage
//! of the group binds against. Everything is declared through chained
//! builder calls, so a whole benchmark reads top to bottom like the run it
//! produces.

use contender_core::{Callback, NamedArgs, Registry, Value};
use contender_logic::Expectation;

/// A named pipeline of stages plus the expectation judging each iteration.
#[derive(Debug)]
pub struct TestCase {
    /// Display title; tests sharing a title across groups fold together in
    /// the cross-run summary.
    pub title: String,
    /// What a correct iteration looks like. `None` checks nothing.
    pub expectation: Option<Expectation>,
    /// The stages, invoked in order each iteration.
    pub pipeline: Vec<Callback>,
}

/// A collection of test cases sharing iteration count and argument tables.
#[derive(Debug)]
pub struct Group {
    /// Display title.
    pub title: String,
    /// Optional note shown next to the title.
    pub comment: Option<String>,
    /// Iteration override; the run default applies when absent.
    pub iterations: Option<u64>,
    /// Excludes this group from the cross-run fold.
    pub ignore_results: bool,
    /// Named arguments bound against stage parameters.
    pub args: NamedArgs,
    /// Named arguments bound against constructor parameters.
    pub construct_args: NamedArgs,
    /// The tests, executed in declaration order.
    pub tests: Vec<TestCase>,
}

impl Group {
    /// An empty group.
    pub fn new(title: impl Into<String>) -> Self {
        Group {
            title: title.into(),
            comment: None,
            iterations: None,
            ignore_results: false,
            args: NamedArgs::default(),
            construct_args: NamedArgs::default(),
            tests: Vec::new(),
        }
    }

    /// Sets the comment shown next to the title.
    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// Overrides the run-level iteration count for this group.
    pub fn iterations(mut self, count: u64) -> Self {
        self.iterations = Some(count);
        self
    }

    /// Excludes this group's results from the cross-run fold. The group
    /// still runs and still counts toward the iteration total.
    pub fn ignore_results(mut self) -> Self {
        self.ignore_results = true;
        self
    }

    /// Supplies a named argument to every stage of the group.
    ///
    /// The reserved names `iteration` and `partial` are injected by the
    /// executor and shadow entries set here.
    pub fn arg(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.args.insert(name.into(), value.into());
        self
    }

    /// Supplies a named argument to constructors of stages that build their
    /// instance per call.
    pub fn construct_arg(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.construct_args.insert(name.into(), value.into());
        self
    }

    /// Adds a test case.
    pub fn test<I, C>(
        mut self,
        title: impl Into<String>,
        expectation: Option<Expectation>,
        pipeline: I,
    ) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<Callback>,
    {
        self.tests.push(TestCase {
            title: title.into(),
            expectation,
            pipeline: pipeline.into_iter().map(Into::into).collect(),
        });
        self
    }
}

/// A whole benchmark run: registry, title and groups.
#[derive(Debug, Default)]
pub struct Suite {
    /// Display title.
    pub title: String,
    /// Optional note shown under the title.
    pub comment: Option<String>,
    /// Callable definitions name references resolve against.
    pub registry: Registry,
    /// The groups, executed in declaration order.
    pub groups: Vec<Group>,
}

impl Suite {
    /// An empty suite.
    pub fn new(title: impl Into<String>) -> Self {
        Suite {
            title: title.into(),
            comment: None,
            registry: Registry::new(),
            groups: Vec::new(),
        }
    }

    /// Sets the comment shown under the title.
    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// Replaces the registry wholesale.
    pub fn registry(mut self, registry: Registry) -> Self {
        self.registry = registry;
        self
    }

    /// Adds a group.
    pub fn group(mut self, group: Group) -> Self {
        self.groups.push(group);
        self
    }

    /// Runs the suite. See [`run`](crate::run).
    pub fn run(
        &self,
        config: &crate::RunConfig,
        renderer: &mut dyn contender_report::Renderer,
    ) -> anyhow::Result<crate::RunReport> {
        crate::runner::run(self, config, renderer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builders_accumulate_in_declaration_order() {
        let suite = Suite::new("strings")
            .comment("joining strategies")
            .group(
                Group::new("small inputs")
                    .comment("8 parts")
                    .iterations(5)
                    .arg("sep", ",")
                    .construct_arg("capacity", 64)
                    .test("push_str", Some(Expectation::new().returns("a,b")), [
                        Callback::reference("join_push"),
                    ])
                    .test("format", None, [Callback::reference("join_format")]),
            )
            .group(Group::new("ignored").ignore_results());

        assert_eq!(suite.title, "strings");
        assert_eq!(suite.groups.len(), 2);

        let group = &suite.groups[0];
        assert_eq!(group.iterations, Some(5));
        assert_eq!(group.args.get("sep"), Some(&Value::from(",")));
        assert_eq!(group.construct_args.get("capacity"), Some(&Value::Int(64)));
        assert_eq!(group.tests.len(), 2);
        assert_eq!(group.tests[0].title, "push_str");
        assert_eq!(group.tests[0].pipeline.len(), 1);
        assert!(group.tests[1].expectation.is_none());

        assert!(suite.groups[1].ignore_results);
        assert!(!group.ignore_results);
    }

    #[test]
    fn string_pipelines_convert_to_references() {
        let group = Group::new("g").test("t", None, ["sort", "Checker::verify"]);
        assert_eq!(group.tests[0].pipeline.len(), 2);
    }
}
