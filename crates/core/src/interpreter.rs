//! The interpreter capability set.
//!
//! Backends implement [`Interpreter`]; wrappers implement it too, with the
//! exact same signatures, so a host cannot tell a wrapped backend from a
//! bare one.

use crate::error::Result;
use crate::id::GroupId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Interpreter properties.
pub type Properties = BTreeMap<String, String>;

/// A pluggable execution backend.
pub trait Interpreter: Send + Sync {
    /// Prepare the backend for use.
    fn open(&self) -> Result<()>;

    /// Release backend resources.
    fn close(&self) -> Result<()>;

    /// Run a piece of code.
    fn interpret(&self, code: &str, context: &InvocationContext) -> Result<InterpreterResult>;

    /// Cancel the run associated with `context`.
    fn cancel(&self, context: &InvocationContext) -> Result<()>;

    /// Kind of dynamic form the backend supports.
    fn form_type(&self) -> Result<FormType>;

    /// Progress of the run associated with `context`, in percent (0-100).
    fn progress(&self, context: &InvocationContext) -> Result<u8>;

    /// Scheduler the host should queue this backend's jobs on.
    fn scheduler(&self) -> Result<SchedulerHandle>;

    /// Completion candidates for `buffer` at `cursor`.
    fn completion(&self, buffer: &str, cursor: usize) -> Result<Vec<String>>;

    /// Name of the backend implementation.
    fn class_name(&self) -> Result<String>;

    /// Attach the backend to a group.
    fn set_group(&self, group: InterpreterGroup) -> Result<()>;

    /// Group the backend belongs to.
    fn group(&self) -> Result<Option<InterpreterGroup>>;

    /// Replace the resource locations visible to the backend.
    fn set_context_resources(&self, resources: Vec<ResourceUrl>) -> Result<()>;

    /// Resource locations visible to the backend.
    fn context_resources(&self) -> Result<Vec<ResourceUrl>>;

    /// Replace all properties.
    fn set_properties(&self, properties: Properties) -> Result<()>;

    /// All properties.
    fn properties(&self) -> Result<Properties>;

    /// A single property.
    fn property(&self, key: &str) -> Result<Option<String>>;

    /// View this interpreter as a wrapper, if it is one.
    fn as_wrapped(&self) -> Option<&dyn WrappedInterpreter> {
        None
    }
}

/// An interpreter that forwards to another one.
pub trait WrappedInterpreter: Interpreter {
    /// The interpreter being wrapped.
    fn inner_interpreter(&self) -> &dyn Interpreter;
}

/// Walk through every wrapper layer down to the real backend.
///
/// This is a plain structural lookup; no wrapper logic runs.
pub fn innermost(interpreter: &dyn Interpreter) -> &dyn Interpreter {
    let mut current = interpreter;
    while let Some(wrapped) = current.as_wrapped() {
        current = wrapped.inner_interpreter();
    }
    current
}

/// Result of interpreting code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterpreterResult {
    /// Outcome code
    pub code: ResultCode,

    /// How the message should be rendered
    pub kind: OutputKind,

    /// Output or error text
    pub message: String,
}

impl InterpreterResult {
    /// Successful text output.
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            code: ResultCode::Success,
            kind: OutputKind::Text,
            message: message.into(),
        }
    }

    /// Error output.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            code: ResultCode::Error,
            kind: OutputKind::Text,
            message: message.into(),
        }
    }

    /// The code is incomplete and needs more input.
    pub fn incomplete() -> Self {
        Self {
            code: ResultCode::Incomplete,
            kind: OutputKind::Text,
            message: String::new(),
        }
    }

    /// Set output kind.
    pub fn with_kind(mut self, kind: OutputKind) -> Self {
        self.kind = kind;
        self
    }

    /// Whether the run succeeded.
    pub fn is_success(&self) -> bool {
        self.code == ResultCode::Success
    }
}

/// Interpretation outcome codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResultCode {
    /// The code ran to completion
    Success,
    /// More input is needed before the code can run
    Incomplete,
    /// The code failed
    Error,
    /// Leave the previous output in place
    KeepPreviousResult,
}

/// Output rendering kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputKind {
    /// Plain text
    Text,
    /// HTML markup
    Html,
    /// Tab-separated rows
    Table,
    /// Encoded image data
    Image,
    /// An Angular template
    Angular,
}

/// Per-invocation information passed by the host.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvocationContext {
    /// Note the paragraph belongs to
    pub note_id: String,

    /// Paragraph being run
    pub paragraph_id: String,

    /// Paragraph title
    pub paragraph_title: Option<String>,

    /// Full paragraph text
    pub paragraph_text: Option<String>,

    /// Paragraph-level configuration
    pub config: Properties,
}

impl InvocationContext {
    /// Create a context for one paragraph run.
    pub fn new(note_id: impl Into<String>, paragraph_id: impl Into<String>) -> Self {
        Self {
            note_id: note_id.into(),
            paragraph_id: paragraph_id.into(),
            ..Default::default()
        }
    }

    /// Set paragraph title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.paragraph_title = Some(title.into());
        self
    }

    /// Set paragraph text.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.paragraph_text = Some(text.into());
        self
    }

    /// Add a config entry.
    pub fn with_config(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.insert(key.into(), value.into());
        self
    }
}

/// Dynamic form support.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FormType {
    /// The backend renders its own forms
    Native,
    /// The host renders forms from template markers
    Simple,
    /// No forms
    None,
}

/// Handle to the scheduler a backend runs on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulerHandle {
    /// Scheduler name
    pub name: String,

    /// Scheduling discipline
    pub kind: SchedulerKind,
}

impl SchedulerHandle {
    /// One job at a time, in submission order.
    pub fn fifo(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: SchedulerKind::Fifo,
        }
    }

    /// Up to `max_concurrency` jobs at once.
    pub fn parallel(name: impl Into<String>, max_concurrency: usize) -> Self {
        Self {
            name: name.into(),
            kind: SchedulerKind::Parallel { max_concurrency },
        }
    }
}

/// Scheduling disciplines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SchedulerKind {
    /// Sequential
    Fifo,
    /// Concurrent, bounded
    Parallel {
        /// Maximum jobs in flight
        max_concurrency: usize,
    },
}

/// A set of interpreters sharing a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterpreterGroup {
    /// Group identifier
    pub id: GroupId,

    /// Group name
    pub name: String,
}

impl InterpreterGroup {
    /// Create a new group.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: GroupId::new(),
            name: name.into(),
        }
    }
}

/// Location of a resource made visible to a backend (a jar, a directory).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceUrl(String);

impl ResourceUrl {
    /// Create from a URL string.
    pub fn new(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    /// Get the URL string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ResourceUrl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ResourceUrl {
    fn from(url: &str) -> Self {
        Self::new(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::InterpretationFailure;

    struct Echo;

    impl Interpreter for Echo {
        fn open(&self) -> Result<()> {
            Ok(())
        }
        fn close(&self) -> Result<()> {
            Ok(())
        }
        fn interpret(&self, code: &str, _context: &InvocationContext) -> Result<InterpreterResult> {
            Ok(InterpreterResult::success(code))
        }
        fn cancel(&self, _context: &InvocationContext) -> Result<()> {
            Ok(())
        }
        fn form_type(&self) -> Result<FormType> {
            Ok(FormType::None)
        }
        fn progress(&self, _context: &InvocationContext) -> Result<u8> {
            Ok(0)
        }
        fn scheduler(&self) -> Result<SchedulerHandle> {
            Ok(SchedulerHandle::fifo("echo"))
        }
        fn completion(&self, _buffer: &str, _cursor: usize) -> Result<Vec<String>> {
            Ok(vec![])
        }
        fn class_name(&self) -> Result<String> {
            Ok("Echo".to_string())
        }
        fn set_group(&self, _group: InterpreterGroup) -> Result<()> {
            Err(InterpretationFailure::new("groups unsupported").into())
        }
        fn group(&self) -> Result<Option<InterpreterGroup>> {
            Ok(None)
        }
        fn set_context_resources(&self, _resources: Vec<ResourceUrl>) -> Result<()> {
            Ok(())
        }
        fn context_resources(&self) -> Result<Vec<ResourceUrl>> {
            Ok(vec![])
        }
        fn set_properties(&self, _properties: Properties) -> Result<()> {
            Ok(())
        }
        fn properties(&self) -> Result<Properties> {
            Ok(Properties::new())
        }
        fn property(&self, _key: &str) -> Result<Option<String>> {
            Ok(None)
        }
    }

    struct Layer(Echo);

    impl Interpreter for Layer {
        fn open(&self) -> Result<()> {
            self.0.open()
        }
        fn close(&self) -> Result<()> {
            self.0.close()
        }
        fn interpret(&self, code: &str, context: &InvocationContext) -> Result<InterpreterResult> {
            self.0.interpret(code, context)
        }
        fn cancel(&self, context: &InvocationContext) -> Result<()> {
            self.0.cancel(context)
        }
        fn form_type(&self) -> Result<FormType> {
            self.0.form_type()
        }
        fn progress(&self, context: &InvocationContext) -> Result<u8> {
            self.0.progress(context)
        }
        fn scheduler(&self) -> Result<SchedulerHandle> {
            self.0.scheduler()
        }
        fn completion(&self, buffer: &str, cursor: usize) -> Result<Vec<String>> {
            self.0.completion(buffer, cursor)
        }
        fn class_name(&self) -> Result<String> {
            Ok("Layer".to_string())
        }
        fn set_group(&self, group: InterpreterGroup) -> Result<()> {
            self.0.set_group(group)
        }
        fn group(&self) -> Result<Option<InterpreterGroup>> {
            self.0.group()
        }
        fn set_context_resources(&self, resources: Vec<ResourceUrl>) -> Result<()> {
            self.0.set_context_resources(resources)
        }
        fn context_resources(&self) -> Result<Vec<ResourceUrl>> {
            self.0.context_resources()
        }
        fn set_properties(&self, properties: Properties) -> Result<()> {
            self.0.set_properties(properties)
        }
        fn properties(&self) -> Result<Properties> {
            self.0.properties()
        }
        fn property(&self, key: &str) -> Result<Option<String>> {
            self.0.property(key)
        }
        fn as_wrapped(&self) -> Option<&dyn WrappedInterpreter> {
            Some(self)
        }
    }

    impl WrappedInterpreter for Layer {
        fn inner_interpreter(&self) -> &dyn Interpreter {
            &self.0
        }
    }

    #[test]
    fn test_innermost_of_bare_backend_is_itself() {
        let echo = Echo;
        assert_eq!(innermost(&echo).class_name().unwrap(), "Echo");
    }

    #[test]
    fn test_innermost_unwraps_layers() {
        let layer = Layer(Echo);
        assert_eq!(layer.class_name().unwrap(), "Layer");
        assert_eq!(innermost(&layer).class_name().unwrap(), "Echo");
    }

    #[test]
    fn test_result_constructors() {
        assert!(InterpreterResult::success("ok").is_success());
        assert_eq!(InterpreterResult::error("bad").code, ResultCode::Error);
        assert_eq!(InterpreterResult::incomplete().code, ResultCode::Incomplete);

        let html = InterpreterResult::success("<b>x</b>").with_kind(OutputKind::Html);
        assert_eq!(html.kind, OutputKind::Html);
    }

    #[test]
    fn test_invocation_context_builder() {
        let ctx = InvocationContext::new("note-1", "para-7")
            .with_title("load data")
            .with_text("%spark sc.version")
            .with_config("editorMode", "scala");

        assert_eq!(ctx.note_id, "note-1");
        assert_eq!(ctx.paragraph_title.as_deref(), Some("load data"));
        assert_eq!(ctx.config.get("editorMode"), Some(&"scala".to_string()));
    }

    #[test]
    fn test_resource_url_serializes_as_string() {
        let url = ResourceUrl::new("file:///opt/lib/dep.jar");
        assert_eq!(
            serde_json::to_string(&url).unwrap(),
            "\"file:///opt/lib/dep.jar\""
        );
    }

    #[test]
    fn test_scheduler_handles() {
        assert_eq!(SchedulerHandle::fifo("s").kind, SchedulerKind::Fifo);
        assert_eq!(
            SchedulerHandle::parallel("p", 4).kind,
            SchedulerKind::Parallel { max_concurrency: 4 }
        );
    }
}
