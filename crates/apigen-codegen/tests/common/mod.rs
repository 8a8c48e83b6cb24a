//! Shared fixtures for apigen-codegen integration tests.

#![allow(dead_code)]

use apigen_core::model::{
    Enum, Field, Message, Method, OperationInfo, PathBinding, PathInfo, PathTemplate, Service,
    Typez,
};
use apigen_core::Api;

/// Source package of the fixture API.
pub const PACKAGE: &str = "google.cloud.secretmanager.v1";

/// Installs a test-friendly subscriber once per test binary.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn id(name: &str) -> String {
    format!(".{PACKAGE}.{name}")
}

/// A trimmed-down Secret Manager API.
///
/// Covers nested messages and enums, a map field, a oneof, a well-known
/// type, a paginated list method, and a long-running method.
pub fn secret_manager() -> Api {
    let mut api = Api::new("secretmanager", PACKAGE)
        .with_title("Secret Manager API")
        .with_description(
            "Stores sensitive data such as API keys, passwords, and certificates.\n\n\
             See https://cloud.google.com/secret-manager.",
        );

    let secret = api.add_message(
        Message::new("Secret", id("Secret"))
            .with_documentation(
                "A [Secret][google.cloud.secretmanager.v1.Secret] is a logical secret.\n\n\
                 Its state is one of [State][google.cloud.secretmanager.v1.Secret.State].",
            )
            .with_field(Field::new("name", Typez::String).with_documentation("Output only."))
            .with_field(
                Field::new("create_time", Typez::Message).with_type_id(".google.protobuf.Timestamp"),
            )
            .with_field(Field::new("labels", Typez::Message).with_type_id(id("Secret.LabelsEntry")))
            .with_field(Field::new("state", Typez::Enum).with_type_id(id("Secret.State")))
            .with_field(Field::new("version_count", Typez::Int64))
            .with_field(Field::new("payload", Typez::Bytes).optional())
            .with_oneof(
                "expiration",
                vec![
                    Field::new("expire_time", Typez::Message)
                        .with_type_id(".google.protobuf.Timestamp"),
                    Field::new("ttl", Typez::Message).with_type_id(".google.protobuf.Duration"),
                ],
            ),
    );
    api.add_nested_message(
        secret,
        Message::map_entry(
            id("Secret.LabelsEntry"),
            Field::new("key", Typez::String),
            Field::new("value", Typez::String),
        ),
    );
    api.add_nested_enum(
        secret,
        Enum::new("State", id("Secret.State"))
            .with_documentation("The state of a secret.")
            .with_value("STATE_UNSPECIFIED", 0)
            .with_value("ENABLED", 1)
            .with_value("DISABLED", 2),
    );

    api.add_message(
        Message::new("GetSecretRequest", id("GetSecretRequest"))
            .with_field(Field::new("name", Typez::String)),
    );
    api.add_message(
        Message::new("ListSecretsRequest", id("ListSecretsRequest"))
            .with_field(Field::new("parent", Typez::String))
            .with_field(Field::new("page_size", Typez::Int32))
            .with_field(Field::new("page_token", Typez::String).optional())
            .with_field(Field::new("filter", Typez::String)),
    );
    api.add_message(
        Message::new("ListSecretsResponse", id("ListSecretsResponse"))
            .with_field(
                Field::new("secrets", Typez::Message)
                    .with_type_id(id("Secret"))
                    .repeated(),
            )
            .with_field(Field::new("next_page_token", Typez::String))
            .pageable_response(),
    );
    api.add_message(
        Message::new("UpdateSecretRequest", id("UpdateSecretRequest"))
            .with_field(Field::new("secret", Typez::Message).with_type_id(id("Secret")).optional())
            .with_field(
                Field::new("update_mask", Typez::Message)
                    .with_type_id(".google.protobuf.FieldMask")
                    .optional(),
            ),
    );
    api.add_message(
        Message::new("Operation", id("Operation")).with_field(Field::new("name", Typez::String)),
    );
    api.add_message(Message::new("OperationMetadata", id("OperationMetadata")));

    let service_id = id("SecretManagerService");
    api.add_service(
        Service::new("SecretManagerService", service_id)
            .with_documentation(
                "Manages secrets.\n\nUse [GetSecret][google.cloud.secretmanager.v1.SecretManagerService.GetSecret] to read one.",
            )
            .with_default_host("secretmanager.googleapis.com")
            .with_method(Method::new(
                "GetSecret",
                id("GetSecretRequest"),
                id("Secret"),
                PathInfo::new(PathBinding::new(
                    "GET",
                    PathTemplate::new().literal("v1").field("name"),
                )),
            ))
            .with_method(Method::new(
                "ListSecrets",
                id("ListSecretsRequest"),
                id("ListSecretsResponse"),
                PathInfo::new(
                    PathBinding::new(
                        "GET",
                        PathTemplate::new().literal("v1").field("parent").literal("secrets"),
                    )
                    .with_query_parameter("page_size")
                    .with_query_parameter("page_token")
                    .with_query_parameter("filter"),
                ),
            ))
            .with_method(Method::new(
                "UpdateSecret",
                id("UpdateSecretRequest"),
                id("Secret"),
                PathInfo::new(
                    PathBinding::new(
                        "PATCH",
                        PathTemplate::new().literal("v1").field("secret.name"),
                    )
                    .with_query_parameter("update_mask"),
                )
                .with_body("secret"),
            ))
            .with_method(
                Method::new(
                    "RotateSecret",
                    id("GetSecretRequest"),
                    id("Operation"),
                    PathInfo::new(PathBinding::new(
                        "POST",
                        PathTemplate::new().literal("v1").field("name").verb("rotate"),
                    ))
                    .with_body("*"),
                )
                .with_operation(OperationInfo {
                    response_type_id: id("Secret"),
                    metadata_type_id: id("OperationMetadata"),
                }),
            ),
    );
    api
}
