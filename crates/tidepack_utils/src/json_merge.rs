use serde_json::Value;

/// Deep merges `overrides` into `base`. Objects are merged key by key, anything else
/// in `overrides` replaces the value in `base`.
pub fn merge_json(base: &mut Value, overrides: Value) {
  match (base, overrides) {
    (Value::Object(base), Value::Object(overrides)) => {
      for (key, value) in overrides {
        match base.get_mut(&key) {
          Some(existing) => merge_json(existing, value),
          None => {
            base.insert(key, value);
          }
        }
      }
    }
    (base, overrides) => *base = overrides,
  }
}

#[test]
fn test_merge_json() {
  use serde_json::json;

  let mut base = json!({ "jsx": "h", "transforms": { "modules": false, "forOf": true } });
  merge_json(&mut base, json!({ "transforms": { "modules": true }, "target": "es5" }));
  assert_eq!(
    base,
    json!({ "jsx": "h", "transforms": { "modules": true, "forOf": true }, "target": "es5" })
  );

  let mut base = json!({ "extract": true });
  merge_json(&mut base, Value::Null);
  assert_eq!(base, Value::Null);
}
