//! OpenAPI fragment helpers shared by the catalog modules.

use serde_json::{json, Value};

/// Schema of the success envelope wrapping `data`
pub fn envelope_schema(data: Value) -> Value {
    json!({
        "type": "object",
        "properties": {
            "success": { "type": "boolean" },
            "data": data,
            "count": { "type": "integer" },
            "message": { "type": "string" }
        },
        "required": ["success"]
    })
}

/// JSON response object for an operation
pub fn json_response(description: &str, schema: Value) -> Value {
    json!({
        "description": description,
        "content": {
            "application/json": {
                "schema": schema
            }
        }
    })
}

/// Failure response using the shared `ErrorResponse` schema
pub fn error_response(description: &str) -> Value {
    json_response(
        description,
        json!({ "$ref": "#/components/schemas/ErrorResponse" }),
    )
}

/// Enveloped list of books
pub fn book_list_response(description: &str) -> Value {
    json_response(
        description,
        envelope_schema(json!({
            "type": "array",
            "items": { "$ref": "#/components/schemas/Book" }
        })),
    )
}

/// Required string path parameter
pub fn path_param(name: &str, description: &str) -> Value {
    json!({
        "name": name,
        "in": "path",
        "required": true,
        "description": description,
        "schema": { "type": "string" }
    })
}
