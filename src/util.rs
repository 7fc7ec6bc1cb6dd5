/// Dotted identifier of a field path, e.g. `role.confidence`.
pub fn field_id(path: &[String]) -> String {
    path.join(".")
}
