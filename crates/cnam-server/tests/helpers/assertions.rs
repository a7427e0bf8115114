//! Custom assertions para tests.

use serde_json::Value;

/// Verifica que una respuesta JSON tenga la forma de un LookupResult.
pub fn assert_lookup_result_schema(json: &Value) {
    assert!(json.is_object(), "Response should be a JSON object");

    let obj = json.as_object().unwrap();

    assert!(obj.contains_key("name"), "Missing 'name' field");
    assert!(obj["name"].is_string(), "'name' should be a string");

    if let Some(number) = obj.get("number") {
        assert!(
            number.is_null() || number.is_string(),
            "'number' should be null or string"
        );
    }

    if let Some(price) = obj.get("price") {
        assert!(price.is_number(), "'price' should be a number");
    }
}

/// Verifica el nombre y numero de un LookupResult.
pub fn assert_lookup_result(json: &Value, name: &str, number: &str) {
    assert_lookup_result_schema(json);
    assert_eq!(json["name"], name, "Unexpected name in {json}");
    assert_eq!(json["number"], number, "Unexpected number in {json}");
}

/// Verifica que sea el resultado desconocido para `number`.
pub fn assert_unknown_result(json: &Value, number: &str) {
    assert_lookup_result(json, "UNKNOWN", number);
}
