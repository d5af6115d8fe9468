/// Data acquisition for the forecast view.
///
/// Submodules:
/// - `field_api`: field list, field save and forecast calls against the
///   agriculture API, behind the `FieldApi` trait.

pub mod field_api;
