//! Callback resolution and guarded invocation.
//!
//! A [`Callback`] is what suites declare: an inline closure, a pre-built
//! instance, or a name to look up. Resolution turns it into an [`Invocable`]
//! against a [`Registry`] once, so name errors surface before any timing
//! starts. Calling an invocable binds arguments, runs the body under a panic
//! guard with a fresh output capture, and classifies the result.

use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use crate::bind::{bind, NamedArgs, Param};
use crate::capture::Capture;
use crate::error::InvokeError;
use crate::outcome::{Outcome, Thrown};
use crate::registry::{
    CallResult, FnBody, FunctionDef, Instance, MethodBody, MethodDef, MethodKind, Registry, State,
    TypeDef, DEFAULT_METHOD,
};
use crate::value::Value;

/// One stage of a pipeline, as declared by a suite.
#[derive(Debug, Clone)]
pub struct Callback {
    inner: CallbackKind,
}

#[derive(Debug, Clone)]
enum CallbackKind {
    Func(Arc<FunctionDef>),
    Object(Instance),
    Ref(String),
}

impl Callback {
    /// An inline closure with declared parameters.
    pub fn closure<P, I, F>(params: I, body: F) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<Param>,
        F: Fn(&mut Capture, &[Value]) -> CallResult + Send + Sync + 'static,
    {
        let def = FunctionDef {
            name: "{closure}".to_string(),
            params: params.into_iter().map(Into::into).collect(),
            body: Arc::new(body),
        };
        Callback { inner: CallbackKind::Func(Arc::new(def)) }
    }

    /// A pre-built instance; its default method runs with this fixed state.
    pub fn object(instance: Instance) -> Self {
        Callback { inner: CallbackKind::Object(instance) }
    }

    /// A name to resolve at run time: a function, a type, or
    /// `"Type::method"`.
    pub fn reference(name: impl Into<String>) -> Self {
        Callback { inner: CallbackKind::Ref(name.into()) }
    }
}

impl From<&str> for Callback {
    fn from(name: &str) -> Self {
        Callback::reference(name)
    }
}

/// A resolved stage, ready to call.
pub struct Invocable {
    inner: InvocableKind,
}

enum InvocableKind {
    Function(Arc<FunctionDef>),
    Static {
        target: String,
        params: Vec<Param>,
        body: FnBody,
    },
    Bound {
        target: String,
        params: Vec<Param>,
        body: MethodBody,
        state: State,
    },
    Deferred {
        target: String,
        params: Vec<Param>,
        body: MethodBody,
        ty: Arc<TypeDef>,
    },
}

impl fmt::Debug for Invocable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.inner {
            InvocableKind::Function(def) => f.debug_tuple("Function").field(&def.name).finish(),
            InvocableKind::Static { target, .. } => f.debug_tuple("Static").field(target).finish(),
            InvocableKind::Bound { target, .. } => f.debug_tuple("Bound").field(target).finish(),
            InvocableKind::Deferred { target, .. } => {
                f.debug_tuple("Deferred").field(target).finish()
            }
        }
    }
}

/// Looks a callback up in the registry.
///
/// A bare name tries functions first, then the type's default method. A
/// `"Type::method"` name addresses one method. Instance methods reached by
/// name construct their state at call time, so each call sees the construct
/// arguments of its own iteration.
pub fn resolve(registry: &Registry, callback: &Callback) -> Result<Invocable, InvokeError> {
    match &callback.inner {
        CallbackKind::Func(def) => Ok(Invocable { inner: InvocableKind::Function(def.clone()) }),
        CallbackKind::Object(instance) => {
            let ty = registry
                .type_def(instance.type_name())
                .ok_or_else(|| InvokeError::UnknownType(instance.type_name().to_string()))?;
            let def = default_method(ty)?;
            Ok(method_invocable(ty, def, Some(instance.state().clone())))
        }
        CallbackKind::Ref(name) => {
            if let Some((type_name, method)) = name.split_once("::") {
                let ty = registry
                    .type_def(type_name)
                    .ok_or_else(|| InvokeError::UnknownType(type_name.to_string()))?;
                let def = ty.method(method).ok_or_else(|| InvokeError::UnknownMethod {
                    type_name: type_name.to_string(),
                    method: method.to_string(),
                })?;
                Ok(method_invocable(ty, def, None))
            } else if let Some(def) = registry.function_def(name) {
                Ok(Invocable { inner: InvocableKind::Function(def.clone()) })
            } else if let Some(ty) = registry.type_def(name) {
                let def = default_method(ty)?;
                Ok(method_invocable(ty, def, None))
            } else {
                Err(InvokeError::UnknownFunction(name.clone()))
            }
        }
    }
}

fn default_method(ty: &Arc<TypeDef>) -> Result<&Arc<MethodDef>, InvokeError> {
    ty.method(DEFAULT_METHOD).ok_or_else(|| InvokeError::UnknownMethod {
        type_name: ty.name.clone(),
        method: DEFAULT_METHOD.to_string(),
    })
}

fn method_invocable(ty: &Arc<TypeDef>, def: &Arc<MethodDef>, state: Option<State>) -> Invocable {
    let target = format!("{}::{}", ty.name, def.name);
    let params = def.params.clone();
    let inner = match &def.kind {
        MethodKind::Static(body) => InvocableKind::Static { target, params, body: body.clone() },
        MethodKind::Instance(body) => match state {
            Some(state) => InvocableKind::Bound { target, params, body: body.clone(), state },
            None => InvocableKind::Deferred { target, params, body: body.clone(), ty: ty.clone() },
        },
    };
    Invocable { inner }
}

impl Invocable {
    /// Binds arguments and runs the stage body.
    ///
    /// `construct_args` only matter for stages that build their instance per
    /// call. Binding failures are harness errors; anything the body does,
    /// including panicking, becomes an [`Outcome`].
    pub fn call(&self, args: &NamedArgs, construct_args: &NamedArgs) -> Result<Outcome, InvokeError> {
        match &self.inner {
            InvocableKind::Function(def) => {
                let bound = bind(&def.params, args, &def.name)?;
                let body = &def.body;
                Ok(run_guarded(|capture| body(capture, &bound)))
            }
            InvocableKind::Static { target, params, body } => {
                let bound = bind(params, args, target)?;
                Ok(run_guarded(|capture| body(capture, &bound)))
            }
            InvocableKind::Bound { target, params, body, state } => {
                let bound = bind(params, args, target)?;
                Ok(run_guarded(|capture| body(state, capture, &bound)))
            }
            InvocableKind::Deferred { target, params, body, ty } => {
                let state = ty.build_state(construct_args)?;
                let bound = bind(params, args, target)?;
                Ok(run_guarded(|capture| body(&state, capture, &bound)))
            }
        }
    }
}

fn run_guarded<F>(body: F) -> Outcome
where
    F: FnOnce(&mut Capture) -> CallResult,
{
    let mut capture = Capture::new();
    let result = match catch_unwind(AssertUnwindSafe(|| body(&mut capture))) {
        Ok(result) => result,
        Err(payload) => Err(Thrown::from_panic(payload)),
    };
    Outcome::from_call(result, capture.into_text())
}
