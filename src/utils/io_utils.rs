use crate::utils::Result;

/// Opens `<prefix>.<suffix>` with `open`.
pub fn create_writer<T, F>(output_prefix: &str, output_suffix: &str, open: F) -> Result<T>
where
    F: FnOnce(&str) -> Result<T>,
{
    let output_path = format!("{}.{}", output_prefix, output_suffix);
    log::debug!("Writing {}", output_path);
    open(&output_path)
}
