//! Services and methods.

use super::path::PathInfo;
use serde::{Deserialize, Serialize};

/// A service: a named group of methods.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    /// Short name
    pub name: String,
    /// Globally unique dotted ID
    pub id: String,
    /// Source package; filled in from the `Api` when empty
    pub package: String,
    /// Free-text documentation
    pub documentation: String,
    /// Default host name, e.g. `secretmanager.googleapis.com`
    pub default_host: String,
    /// Methods in declaration order
    pub methods: Vec<Method>,
}

impl Service {
    /// Creates a service without methods.
    #[must_use]
    pub fn new(name: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: id.into(),
            package: String::new(),
            documentation: String::new(),
            default_host: String::new(),
            methods: Vec::new(),
        }
    }

    /// Appends a method, deriving its ID from the service ID.
    #[must_use]
    pub fn with_method(mut self, mut method: Method) -> Self {
        method.id = format!("{}.{}", self.id, method.name);
        self.methods.push(method);
        self
    }

    /// Sets the documentation.
    #[must_use]
    pub fn with_documentation(mut self, documentation: impl Into<String>) -> Self {
        self.documentation = documentation.into();
        self
    }

    /// Sets the default host.
    #[must_use]
    pub fn with_default_host(mut self, host: impl Into<String>) -> Self {
        self.default_host = host.into();
        self
    }

    /// Sets the source package.
    #[must_use]
    pub fn with_package(mut self, package: impl Into<String>) -> Self {
        self.package = package.into();
        self
    }
}

/// A remote procedure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Method {
    /// Short name
    pub name: String,
    /// `<service id>.<name>`; filled in by `Service::with_method`
    pub id: String,
    /// Free-text documentation
    pub documentation: String,
    /// ID of the request message
    pub input_type_id: String,
    /// ID of the response message
    pub output_type_id: String,
    /// HTTP bindings
    pub path_info: PathInfo,
    /// Present for long-running operations
    pub operation_info: Option<OperationInfo>,
    /// The client streams requests
    pub client_streaming: bool,
    /// The server streams responses
    pub server_streaming: bool,
}

impl Method {
    /// Creates a unary method.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        input_type_id: impl Into<String>,
        output_type_id: impl Into<String>,
        path_info: PathInfo,
    ) -> Self {
        Self {
            name: name.into(),
            id: String::new(),
            documentation: String::new(),
            input_type_id: input_type_id.into(),
            output_type_id: output_type_id.into(),
            path_info,
            operation_info: None,
            client_streaming: false,
            server_streaming: false,
        }
    }

    /// Sets the documentation.
    #[must_use]
    pub fn with_documentation(mut self, documentation: impl Into<String>) -> Self {
        self.documentation = documentation.into();
        self
    }

    /// Marks the method as a long-running operation.
    #[must_use]
    pub fn with_operation(mut self, info: OperationInfo) -> Self {
        self.operation_info = Some(info);
        self
    }

    /// Marks the method as server-streaming.
    #[must_use]
    pub const fn server_streaming(mut self) -> Self {
        self.server_streaming = true;
        self
    }
}

/// Long-running operation metadata of a method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationInfo {
    /// ID of the message returned when the operation completes
    pub response_type_id: String,
    /// ID of the message reported while the operation runs
    pub metadata_type_id: String,
}
