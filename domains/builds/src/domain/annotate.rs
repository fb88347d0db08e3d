//! Primary-artifact annotation
//!
//! The primary artifact parses to a JSON array with one object per logical
//! graphics component, and the k-th component's payload is the job's
//! (k + 1)-th resource. That positional coupling is the generator's output
//! contract; this module applies it to produce the client-facing response.

use serde_json::Value;

use scaffoldweb_common::{Error, Result};

use crate::domain::entities::Job;

/// Parse a stored job's primary artifact and annotate each logical
/// component with the retrieval URL of its payload resource.
///
/// Component `k` (0-indexed over the parsed array) receives
/// `"URL": "/output/{id}"` for `resources[k + 1]`. A primary that references
/// more components than there are follow-up resources is a generator
/// contract violation and fails; surplus resources simply stay unannotated.
pub fn annotated_primary(job: &Job) -> Result<Value> {
    let primary = job
        .primary()
        .ok_or_else(|| Error::Annotation("job has no primary artifact".to_string()))?;

    let mut parsed: Value = serde_json::from_slice(&primary.data)
        .map_err(|e| Error::Annotation(format!("primary artifact is not valid JSON: {e}")))?;

    let components = parsed
        .as_array_mut()
        .ok_or_else(|| Error::Annotation("primary artifact is not a component array".to_string()))?;

    let available = job.resources.len() - 1;
    if components.len() > available {
        return Err(Error::Annotation(format!(
            "primary artifact lists {} components but the job holds {} payload resources",
            components.len(),
            available
        )));
    }

    for (component, resource) in components.iter_mut().zip(job.resources.iter().skip(1)) {
        let object = component.as_object_mut().ok_or_else(|| {
            Error::Annotation("primary artifact component is not an object".to_string())
        })?;
        object.insert(
            "URL".to_string(),
            Value::String(format!("/output/{}", resource.id)),
        );
    }

    Ok(parsed)
}
