//! API documentation served under `/swagger/`.

use axum::Json;
use axum::response::Html;
use serde_json::{Value, json};

const SWAGGER_UI_PAGE: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8" />
  <title>SMS relay API</title>
  <link rel="stylesheet" href="https://unpkg.com/swagger-ui-dist@5/swagger-ui.css" />
</head>
<body>
  <div id="swagger-ui"></div>
  <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-bundle.js" crossorigin></script>
  <script>
    window.onload = () => {
      window.ui = SwaggerUIBundle({ url: "doc.json", dom_id: "#swagger-ui" });
    };
  </script>
</body>
</html>
"##;

/// Swagger 2.0 description of the public routes.
pub fn api_document() -> Value {
    let text_response = |description: &str| {
        json!({
            "description": description,
            "schema": { "type": "string" }
        })
    };

    json!({
        "swagger": "2.0",
        "info": {
            "title": "SMS relay",
            "description": "Forwards SMS send requests to the configured SMS gateway.",
            "version": env!("CARGO_PKG_VERSION")
        },
        "paths": {
            "/send-sms": {
                "post": {
                    "summary": "Send SMS",
                    "description": "Sends an SMS message to one or more phone numbers",
                    "consumes": ["application/json"],
                    "produces": ["text/plain"],
                    "parameters": [{
                        "name": "sms",
                        "in": "body",
                        "required": true,
                        "description": "Send SMS request",
                        "schema": { "$ref": "#/definitions/SmsRequest" }
                    }],
                    "responses": {
                        "200": text_response("SMS sent successfully"),
                        "400": text_response("Invalid request body or number format"),
                        "500": text_response("Internal server error")
                    }
                }
            },
            "/health": {
                "get": {
                    "summary": "Health check",
                    "produces": ["text/plain"],
                    "responses": {
                        "200": text_response("API is up and running")
                    }
                }
            }
        },
        "definitions": {
            "SmsRequest": {
                "type": "object",
                "required": ["number", "message", "sender"],
                "properties": {
                    "number": {
                        "description": "Phone number, or an array of phone numbers, that will receive the message"
                    },
                    "message": {
                        "type": "string",
                        "description": "The message to be sent"
                    },
                    "sender": {
                        "type": "string",
                        "description": "The number or name of the sender. A number can't be longer than 14 characters; a name can't be longer than 11 characters and can't contain special characters or spaces"
                    },
                    "date": {
                        "type": "string",
                        "description": "Send time in yyyy-MM-dd HH:mm format. Sent as soon as possible when omitted"
                    },
                    "reference": {
                        "type": "string",
                        "description": "Custom reference, max. 255 characters"
                    },
                    "test": {
                        "type": "boolean",
                        "description": "Check all parameters without sending the message"
                    },
                    "subid": {
                        "type": "string",
                        "description": "Subaccount to send the message from"
                    }
                }
            }
        }
    })
}

pub(crate) async fn doc_json() -> Json<Value> {
    Json(api_document())
}

pub(crate) async fn index() -> Html<&'static str> {
    Html(SWAGGER_UI_PAGE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_public_routes() {
        let doc = api_document();
        assert_eq!(doc["swagger"], "2.0");
        assert!(doc["paths"]["/send-sms"]["post"].is_object());
        assert!(doc["paths"]["/health"]["get"].is_object());

        let properties = doc["definitions"]["SmsRequest"]["properties"]
            .as_object()
            .unwrap();
        for field in ["number", "message", "sender", "date", "reference", "test", "subid"] {
            assert!(properties.contains_key(field), "{field}");
        }
    }
}
