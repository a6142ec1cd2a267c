//! Names for every operation of the capability set.

/// One operation of the interpreter capability set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Start the backend
    Open,
    /// Shut the backend down
    Close,
    /// Run a piece of code
    Interpret,
    /// Stop a running interpretation
    Cancel,
    /// Report how forms are rendered
    FormType,
    /// Report interpretation progress
    Progress,
    /// Return the backend's scheduler
    Scheduler,
    /// Suggest completions at a cursor
    Completion,
    /// Report the backend's type name
    ClassName,
    /// Attach the backend to a group
    SetGroup,
    /// Return the backend's group
    Group,
    /// Replace the backend's resource list
    SetContextResources,
    /// Return the backend's resource list
    ContextResources,
    /// Replace the backend's properties
    SetProperties,
    /// Return the backend's properties
    Properties,
    /// Look up one property
    Property,
}

impl Operation {
    /// Every operation, in capability-set order.
    pub const ALL: [Operation; 16] = [
        Operation::Open,
        Operation::Close,
        Operation::Interpret,
        Operation::Cancel,
        Operation::FormType,
        Operation::Progress,
        Operation::Scheduler,
        Operation::Completion,
        Operation::ClassName,
        Operation::SetGroup,
        Operation::Group,
        Operation::SetContextResources,
        Operation::ContextResources,
        Operation::SetProperties,
        Operation::Properties,
        Operation::Property,
    ];

    /// Stable name used in logs and failure messages.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Close => "close",
            Self::Interpret => "interpret",
            Self::Cancel => "cancel",
            Self::FormType => "form_type",
            Self::Progress => "progress",
            Self::Scheduler => "scheduler",
            Self::Completion => "completion",
            Self::ClassName => "class_name",
            Self::SetGroup => "set_group",
            Self::Group => "group",
            Self::SetContextResources => "set_context_resources",
            Self::ContextResources => "context_resources",
            Self::SetProperties => "set_properties",
            Self::Properties => "properties",
            Self::Property => "property",
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
