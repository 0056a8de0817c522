//! Registration of callable definitions.
//!
//! A [`Registry`] holds free functions and types. Types carry an optional
//! constructor plus instance and static methods; their state is stored
//! type-erased so one registry can hold heterogeneous fixtures. Pipelines
//! refer to registered names, so a suite can be declared as plain data and
//! resolved against the registry when it runs.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use fxhash::FxHashMap;

use crate::bind::{bind, NamedArgs, Param};
use crate::capture::Capture;
use crate::error::InvokeError;
use crate::outcome::Thrown;
use crate::value::Value;

/// Method looked up when a pipeline names a type without a method.
pub const DEFAULT_METHOD: &str = "invoke";

/// What a stage body produces: a value, or a thrown error.
pub type CallResult = Result<Value, Thrown>;

/// Type-erased instance state shared across iterations.
pub type State = Arc<dyn Any + Send + Sync>;

pub(crate) type FnBody = Arc<dyn Fn(&mut Capture, &[Value]) -> CallResult + Send + Sync>;
pub(crate) type MethodBody = Arc<dyn Fn(&State, &mut Capture, &[Value]) -> CallResult + Send + Sync>;
pub(crate) type CtorBody = Arc<dyn Fn(&[Value]) -> State + Send + Sync>;

/// A registered free function.
pub(crate) struct FunctionDef {
    pub(crate) name: String,
    pub(crate) params: Vec<Param>,
    pub(crate) body: FnBody,
}

impl fmt::Debug for FunctionDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionDef")
            .field("name", &self.name)
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

pub(crate) enum MethodKind {
    Static(FnBody),
    Instance(MethodBody),
}

/// A registered method of a type.
pub(crate) struct MethodDef {
    pub(crate) name: String,
    pub(crate) params: Vec<Param>,
    pub(crate) kind: MethodKind,
}

impl fmt::Debug for MethodDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodDef")
            .field("name", &self.name)
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

pub(crate) struct Constructor {
    pub(crate) params: Vec<Param>,
    pub(crate) build: CtorBody,
}

/// A registered type: optional constructor plus methods.
pub(crate) struct TypeDef {
    pub(crate) name: String,
    pub(crate) constructor: Option<Constructor>,
    pub(crate) methods: FxHashMap<String, Arc<MethodDef>>,
}

impl TypeDef {
    pub(crate) fn method(&self, name: &str) -> Option<&Arc<MethodDef>> {
        self.methods.get(name)
    }

    /// Builds instance state from already bound constructor arguments.
    pub(crate) fn build_state(&self, args: &NamedArgs) -> Result<State, InvokeError> {
        match &self.constructor {
            Some(constructor) => {
                let target = format!("{}::new", self.name);
                let bound = bind(&constructor.params, args, &target)?;
                Ok((constructor.build)(&bound))
            }
            None => Ok(Arc::new(())),
        }
    }
}

impl fmt::Debug for TypeDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeDef")
            .field("name", &self.name)
            .field("methods", &self.methods.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

/// A constructed instance of a registered type.
///
/// The state is shared, so cloning an instance aliases it.
#[derive(Clone)]
pub struct Instance {
    type_name: String,
    state: State,
}

impl Instance {
    /// Name of the registered type this instance came from.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub(crate) fn state(&self) -> &State {
        &self.state
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instance")
            .field("type_name", &self.type_name)
            .finish_non_exhaustive()
    }
}

/// Callable definitions addressed by name.
#[derive(Default)]
pub struct Registry {
    functions: FxHashMap<String, Arc<FunctionDef>>,
    types: FxHashMap<String, Arc<TypeDef>>,
}

impl Registry {
    /// An empty registry.
    pub fn new() -> Self {
        Registry::default()
    }

    /// Registers a free function.
    pub fn function<P, I, F>(&mut self, name: impl Into<String>, params: I, body: F) -> &mut Self
    where
        I: IntoIterator<Item = P>,
        P: Into<Param>,
        F: Fn(&mut Capture, &[Value]) -> CallResult + Send + Sync + 'static,
    {
        let name = name.into();
        let def = FunctionDef {
            name: name.clone(),
            params: params.into_iter().map(Into::into).collect(),
            body: Arc::new(body),
        };
        self.functions.insert(name, Arc::new(def));
        self
    }

    /// Starts registering a type whose instance state is `T`.
    pub fn ty<T>(&mut self, name: impl Into<String>) -> TypeBuilder<'_, T>
    where
        T: Send + Sync + 'static,
    {
        TypeBuilder {
            registry: self,
            name: name.into(),
            constructor: None,
            methods: FxHashMap::default(),
            marker: std::marker::PhantomData,
        }
    }

    /// Constructs an instance of a registered type.
    ///
    /// Types without a constructor get unit state; constructor parameters
    /// bind against `args` under the target name `Type::new`.
    pub fn instantiate(&self, name: &str, args: &NamedArgs) -> Result<Instance, InvokeError> {
        let ty = self
            .types
            .get(name)
            .ok_or_else(|| InvokeError::UnknownType(name.to_string()))?;
        Ok(Instance {
            type_name: ty.name.clone(),
            state: ty.build_state(args)?,
        })
    }

    pub(crate) fn function_def(&self, name: &str) -> Option<&Arc<FunctionDef>> {
        self.functions.get(name)
    }

    pub(crate) fn type_def(&self, name: &str) -> Option<&Arc<TypeDef>> {
        self.types.get(name)
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("functions", &self.functions.len())
            .field("types", &self.types.len())
            .finish()
    }
}

/// Builder for one type registration. Finish with [`TypeBuilder::register`].
pub struct TypeBuilder<'registry, T> {
    registry: &'registry mut Registry,
    name: String,
    constructor: Option<Constructor>,
    methods: FxHashMap<String, Arc<MethodDef>>,
    marker: std::marker::PhantomData<T>,
}

impl<T> TypeBuilder<'_, T>
where
    T: Send + Sync + 'static,
{
    /// Declares the constructor.
    pub fn constructor<P, I, F>(mut self, params: I, build: F) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<Param>,
        F: Fn(&[Value]) -> T + Send + Sync + 'static,
    {
        self.constructor = Some(Constructor {
            params: params.into_iter().map(Into::into).collect(),
            build: Arc::new(move |args| Arc::new(build(args))),
        });
        self
    }

    /// Declares an instance method receiving `&T`.
    pub fn method<P, I, F>(mut self, name: impl Into<String>, params: I, body: F) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<Param>,
        F: Fn(&T, &mut Capture, &[Value]) -> CallResult + Send + Sync + 'static,
    {
        let name = name.into();
        let target = format!("{}::{}", self.name, name);
        let wrapped: MethodBody = Arc::new(move |state, capture, args| {
            match state.downcast_ref::<T>() {
                Some(inner) => body(inner, capture, args),
                None => Err(Thrown::new(
                    "TypeError",
                    format!("invalid state for \"{target}\""),
                )),
            }
        });
        self.insert(name, params, MethodKind::Instance(wrapped));
        self
    }

    /// Declares a static method.
    pub fn static_method<P, I, F>(mut self, name: impl Into<String>, params: I, body: F) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<Param>,
        F: Fn(&mut Capture, &[Value]) -> CallResult + Send + Sync + 'static,
    {
        self.insert(name.into(), params, MethodKind::Static(Arc::new(body)));
        self
    }

    /// Writes the finished type into the registry.
    pub fn register(self) {
        let def = TypeDef {
            name: self.name.clone(),
            constructor: self.constructor,
            methods: self.methods,
        };
        self.registry.types.insert(self.name, Arc::new(def));
    }

    fn insert<P, I>(&mut self, name: String, params: I, kind: MethodKind)
    where
        I: IntoIterator<Item = P>,
        P: Into<Param>,
    {
        let def = MethodDef {
            name: name.clone(),
            params: params.into_iter().map(Into::into).collect(),
            kind,
        };
        self.methods.insert(name, Arc::new(def));
    }
}
