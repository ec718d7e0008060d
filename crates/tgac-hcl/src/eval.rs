//! Evaluation contexts for configuration expressions.
//!
//! The decoder asks an [`EvalContextProvider`] for the variables and
//! functions available while evaluating a file. [`TerragruntFunctions`]
//! provides the Terragrunt path and environment helpers that commonly appear
//! in `include` paths and `locals`.
//!
//! `hcl-rs` functions are plain `fn` pointers, so helpers that depend on the
//! file being evaluated read it from a thread-local [`FileScope`] that the
//! decoder enters for the duration of an evaluation.

use std::cell::RefCell;

use hcl::Value;
use hcl::eval::{Context, FuncArgs, FuncDef, ParamType};
use tgac_fs::NormalizedPath;

use crate::functions::declare_std_functions;

/// Supplies the evaluation context for one configuration file.
pub trait EvalContextProvider {
    /// Build the context used to evaluate the expressions of `scope.config`.
    fn context_for(&self, scope: &FileScope) -> Context<'static>;
}

/// The file being evaluated and, when it is evaluated on behalf of a child
/// config, the child that included it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileScope {
    /// Config file whose expressions are evaluated
    pub config: NormalizedPath,
    /// Config that included `config`, when resolving a parent for a child
    pub child: Option<NormalizedPath>,
}

thread_local! {
    static CURRENT_SCOPE: RefCell<Option<FileScope>> = const { RefCell::new(None) };
}

impl FileScope {
    pub fn new(config: NormalizedPath) -> Self {
        Self {
            config,
            child: None,
        }
    }

    pub fn with_child(mut self, child: NormalizedPath) -> Self {
        self.child = Some(child);
        self
    }

    /// Make this scope current until the returned guard is dropped.
    pub fn enter(&self) -> ScopeGuard {
        let previous = CURRENT_SCOPE.with(|current| current.replace(Some(self.clone())));
        ScopeGuard { previous }
    }

    /// The config the evaluation was started for: the child when resolving a
    /// parent on its behalf, otherwise the file itself.
    pub fn original(&self) -> &NormalizedPath {
        self.child.as_ref().unwrap_or(&self.config)
    }

    fn current() -> Option<FileScope> {
        CURRENT_SCOPE.with(|current| current.borrow().clone())
    }
}

/// Restores the previously entered [`FileScope`] on drop.
#[must_use]
pub struct ScopeGuard {
    previous: Option<FileScope>,
}

impl Drop for ScopeGuard {
    fn drop(&mut self) {
        let previous = self.previous.take();
        CURRENT_SCOPE.with(|current| *current.borrow_mut() = previous);
    }
}

/// Default provider exposing Terragrunt's path and environment functions.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerragruntFunctions;

impl EvalContextProvider for TerragruntFunctions {
    fn context_for(&self, _scope: &FileScope) -> Context<'static> {
        let mut ctx = Context::new();
        declare_std_functions(&mut ctx);
        ctx.declare_func(
            "find_in_parent_folders",
            FuncDef::builder()
                .variadic_param(ParamType::Any)
                .build(find_in_parent_folders),
        );
        ctx.declare_func(
            "get_terragrunt_dir",
            FuncDef::builder().build(get_terragrunt_dir),
        );
        ctx.declare_func(
            "get_original_terragrunt_dir",
            FuncDef::builder().build(get_terragrunt_dir),
        );
        ctx.declare_func(
            "get_parent_terragrunt_dir",
            FuncDef::builder().build(get_parent_terragrunt_dir),
        );
        ctx.declare_func(
            "path_relative_to_include",
            FuncDef::builder().build(path_relative_to_include),
        );
        ctx.declare_func(
            "path_relative_from_include",
            FuncDef::builder().build(path_relative_from_include),
        );
        ctx.declare_func(
            "get_env",
            FuncDef::builder()
                .param(ParamType::String)
                .variadic_param(ParamType::Any)
                .build(get_env),
        );
        ctx
    }
}

fn scope() -> Result<FileScope, String> {
    FileScope::current().ok_or_else(|| "function called outside of a config evaluation".to_string())
}

fn dir_of(path: &NormalizedPath) -> NormalizedPath {
    path.parent().unwrap_or_else(|| path.clone())
}

fn path_value(path: &NormalizedPath) -> Value {
    Value::String(path.as_str().to_string())
}

/// `find_in_parent_folders([name[, fallback]])`
///
/// Searches the directories above the original config for `name`
/// (default `terragrunt.hcl`) and returns its absolute path.
fn find_in_parent_folders(args: FuncArgs) -> Result<Value, String> {
    let scope = scope()?;
    let name = match args.first() {
        Some(Value::String(name)) => name.clone(),
        Some(other) => return Err(format!("expected a file name, got {other:?}")),
        None => "terragrunt.hcl".to_string(),
    };

    let start = dir_of(scope.original());
    let mut dir = start.parent();
    while let Some(current) = dir {
        let candidate = current.join(&name);
        if candidate.is_file() {
            return Ok(path_value(&candidate));
        }
        dir = current.parent();
    }

    match args.get(1) {
        Some(fallback) => Ok(fallback.clone()),
        None => Err(format!(
            "could not find {name} in any parent folder of {start}"
        )),
    }
}

fn get_terragrunt_dir(_args: FuncArgs) -> Result<Value, String> {
    let scope = scope()?;
    Ok(path_value(&dir_of(scope.original())))
}

/// Directory of the included parent, or of the config itself when there is none.
fn get_parent_terragrunt_dir(_args: FuncArgs) -> Result<Value, String> {
    let scope = scope()?;
    Ok(path_value(&dir_of(&scope.config)))
}

fn path_relative_to_include(_args: FuncArgs) -> Result<Value, String> {
    let scope = scope()?;
    let Some(child) = scope.child.as_ref() else {
        return Ok(Value::String(".".to_string()));
    };
    let relative = dir_of(child)
        .relative_to(&dir_of(&scope.config))
        .ok_or_else(|| format!("{child} and {} do not share a root", scope.config))?;
    Ok(Value::String(relative))
}

fn path_relative_from_include(_args: FuncArgs) -> Result<Value, String> {
    let scope = scope()?;
    let Some(child) = scope.child.as_ref() else {
        return Ok(Value::String(".".to_string()));
    };
    let relative = dir_of(&scope.config)
        .relative_to(&dir_of(child))
        .ok_or_else(|| format!("{child} and {} do not share a root", scope.config))?;
    Ok(Value::String(relative))
}

/// `get_env(name[, default])`
fn get_env(args: FuncArgs) -> Result<Value, String> {
    let name = args
        .first()
        .and_then(Value::as_str)
        .ok_or_else(|| "get_env expects a variable name".to_string())?;
    match std::env::var(name) {
        Ok(value) => Ok(Value::String(value)),
        Err(_) => match args.get(1) {
            Some(default) => Ok(default.clone()),
            None => Ok(Value::String(String::new())),
        },
    }
}
