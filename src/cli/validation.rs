use crate::cli::args::CliArgs;
use crate::render::ViewRole;

pub fn validate(args: &CliArgs) -> Result<(), String> {
    if let Some(role) = args.role.as_deref() {
        if ViewRole::parse(role).is_none() {
            return Err(format!(
                "invalid --role '{role}', expected student or teacher"
            ));
        }
    }
    if let Some(page_length) = args.page_length {
        crate::utils::validate_page_length(page_length)
            .map_err(|e| format!("invalid --page-length: {e}"))?;
    }
    if let Some(interval) = args.poll_interval {
        crate::utils::validate_poll_interval(interval)
            .map_err(|e| format!("invalid --interval: {e}"))?;
    }
    if let Some(timeout) = args.timeout {
        if timeout == 0 {
            return Err("invalid --timeout, expected a positive number of seconds".to_string());
        }
    }
    if let Some(viewer_id) = args.viewer_id {
        if viewer_id <= 0 {
            return Err("invalid --uid, expected a positive id".to_string());
        }
    }
    Ok(())
}
