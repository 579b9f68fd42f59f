use serde_json::Value;

/// One advertised model from an endpoint's `/models` route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelEntry {
    pub id: String,
    pub label: String,
}

/// Normalize the model listing response. Providers disagree on the envelope:
/// a bare array, `{data: [...]}` (OpenAI), or `{models: [...]}`; anything
/// else normalizes to an empty list rather than an error.
pub fn normalize_model_list(value: &Value) -> Vec<ModelEntry> {
    let list = if let Some(array) = value.as_array() {
        array
    } else if let Some(array) = value.get("data").and_then(Value::as_array) {
        array
    } else if let Some(array) = value.get("models").and_then(Value::as_array) {
        array
    } else {
        return Vec::new();
    };

    list.iter().filter_map(model_entry).collect()
}

fn model_entry(value: &Value) -> Option<ModelEntry> {
    if let Some(id) = value.as_str() {
        return Some(ModelEntry {
            id: id.to_owned(),
            label: id.to_owned(),
        });
    }
    let id = value
        .get("id")
        .and_then(Value::as_str)
        .or_else(|| value.get("model").and_then(Value::as_str))?;
    Some(ModelEntry {
        id: id.to_owned(),
        label: id.to_owned(),
    })
}
