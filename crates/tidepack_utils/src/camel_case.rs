/// `@scope/my-lib` -> `scopeMyLib`, `my_lib` -> `myLib`.
pub fn camel_case(input: &str) -> String {
  let mut result = String::with_capacity(input.len());
  let mut upper_next = false;
  for char in input.chars() {
    if char.is_ascii_alphanumeric() {
      if result.is_empty() {
        result.push(char.to_ascii_lowercase());
      } else if upper_next {
        result.push(char.to_ascii_uppercase());
      } else {
        result.push(char);
      }
      upper_next = false;
    } else {
      upper_next = true;
    }
  }
  result
}

#[test]
fn test_camel_case() {
  assert_eq!(camel_case("my-lib"), "myLib");
  assert_eq!(camel_case("@scope/my-lib"), "scopeMyLib");
  assert_eq!(camel_case("my_lib.js"), "myLibJs");
  assert_eq!(camel_case("Vue"), "vue");
  assert_eq!(camel_case(""), "");
}
