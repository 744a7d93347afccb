//! Lifecycle controller
//!
//! Sequences create, read, update and delete for any [`Resource`] against a
//! [`RemoteClient`]. The update path is chosen by the kind's
//! [`Mutability`] class:
//!
//! - in-place: one `PATCH` against the existing identifier
//! - replace-only: `DELETE` then `POST`, the identifier changes
//! - content-gated: nothing at all if the artifact digest is unchanged,
//!   otherwise delete and upload
//!
//! Calls for one resource are strictly sequential. A failed call is never
//! retried and never leaves a partially overwritten model behind: responses
//! are decoded before any field is touched.

use crate::checksum::digest;
use crate::client::{Method, RemoteClient, RemoteResponse};
use crate::diff::{ResourceDiff, mark_removed};
use crate::error::{Error, Result};
use crate::resource::{Payload, Resource};
use crate::types::{Action, ApplyResult, Mutability, ReadOutcome};
use log::{debug, info, warn};

/// Generic lifecycle controller bound to one remote client.
pub struct Lifecycle<'a, C: RemoteClient + ?Sized> {
    client: &'a C,
}

impl<'a, C: RemoteClient + ?Sized> Lifecycle<'a, C> {
    /// Create a controller over a client.
    pub fn new(client: &'a C) -> Self {
        Self { client }
    }

    /// Create the resource remotely.
    ///
    /// On success the returned model carries the new identifier and every
    /// remote-echoed field. On failure nothing is recorded.
    ///
    /// # Errors
    ///
    /// Local, transport, remote and decode errors are returned as-is.
    /// A 2xx response without an identifier is `Error::MissingIdentifier`.
    pub fn create<R: Resource>(&self, desired: &R) -> Result<R> {
        let payload = desired.to_request()?;
        self.create_with(desired, payload)
    }

    fn create_with<R: Resource>(&self, desired: &R, payload: Payload) -> Result<R> {
        let checksum = match &payload {
            Payload::Upload(upload) => Some(digest(&upload.content)),
            Payload::Json(_) => None,
        };
        let applied = payload.as_json().cloned();

        let response = self.submit::<R>(Method::Post, R::COLLECTION, &payload)?;
        let decoded = decode::<R>(require_success::<R>(response)?)?;

        let mut observed = desired.clone();
        observed.set_id(String::new());
        observed.apply_response(decoded);
        if observed.id().is_empty() {
            return Err(Error::MissingIdentifier { kind: R::KIND });
        }
        if let Some(checksum) = checksum {
            observed.set_checksum(checksum);
        }
        observed.set_applied(applied);

        info!("Created {} {}", R::KIND, observed.id());
        Ok(observed)
    }

    /// Fetch the current remote state of a bound resource.
    ///
    /// The held model supplies the identifier and any local-only inputs;
    /// every remote-echoed field is overwritten from the response.
    ///
    /// # Errors
    ///
    /// `Error::Unbound` if the model has no identifier. A 404 is not an
    /// error: it yields [`ReadOutcome::NotFound`].
    pub fn read<R: Resource>(&self, held: &R) -> Result<ReadOutcome<R>> {
        if held.id().is_empty() {
            return Err(Error::Unbound { kind: R::KIND });
        }

        let path = held.instance_path();
        debug!("GET {}", path);
        let response = self.client.send(Method::Get, &path, None)?;
        if response.is_not_found() {
            warn!("{} {} not found remotely", R::KIND, held.id());
            return Ok(ReadOutcome::NotFound);
        }
        let decoded = decode::<R>(require_success::<R>(response)?)?;

        let mut observed = held.clone();
        observed.apply_response(decoded);
        if observed.id().is_empty() {
            observed.set_id(held.id().to_string());
        }
        Ok(ReadOutcome::Found(observed))
    }

    /// Move a resource from its previous observed state to a desired state.
    ///
    /// An unbound `previous` is created. The returned model's identifier is
    /// the one callers must keep; for replace-only and re-uploaded content
    /// it differs from `previous`.
    ///
    /// # Errors
    ///
    /// If a replace deleted the old resource but the following create
    /// failed, returns `Error::ReplaceIncomplete`; the old identifier no
    /// longer exists.
    pub fn update<R: Resource>(&self, previous: &R, desired: &R) -> Result<R> {
        if previous.id().is_empty() {
            return self.create(desired);
        }

        match R::MUTABILITY {
            Mutability::InPlace => self.patch(previous, desired),
            Mutability::ReplaceOnly => {
                let payload = desired.to_request()?;
                self.replace(previous, desired, payload)
            }
            Mutability::ContentGated => {
                let payload = desired.to_request()?;
                let Payload::Upload(upload) = &payload else {
                    return Err(Error::invalid(R::KIND, "content resources must upload"));
                };

                let fresh = digest(&upload.content);
                if previous.checksum() == Some(fresh.as_str()) {
                    debug!("{} {} content unchanged", R::KIND, previous.id());
                    let mut kept = previous.clone();
                    kept.adopt_local_inputs(desired);
                    kept.set_checksum(fresh);
                    return Ok(kept);
                }
                self.replace(previous, desired, payload)
            }
        }
    }

    fn patch<R: Resource>(&self, previous: &R, desired: &R) -> Result<R> {
        let mut payload = desired.to_update_request()?;
        let applied = desired.to_request()?.as_json().cloned();
        if let (Payload::Json(body), Some(before), Some(after)) =
            (&mut payload, previous.applied(), applied.as_ref())
        {
            mark_removed(body, before, after);
        }

        let path = previous.instance_path();
        let response = self.submit::<R>(Method::Patch, &path, &payload)?;
        if response.is_not_found() {
            return Err(Error::NotFound {
                kind: R::KIND,
                id: previous.id().to_string(),
            });
        }
        let decoded = decode::<R>(require_success::<R>(response)?)?;

        let mut observed = desired.clone();
        observed.apply_response(decoded);
        observed.set_id(previous.id().to_string());
        observed.set_applied(applied);

        info!("Updated {} {}", R::KIND, observed.id());
        Ok(observed)
    }

    fn replace<R: Resource>(&self, previous: &R, desired: &R, payload: Payload) -> Result<R> {
        let old_id = previous.id().to_string();
        let mut doomed = previous.clone();
        self.delete(&mut doomed)?;

        self.create_with(desired, payload)
            .map(|observed| {
                info!("Replaced {} {} with {}", R::KIND, old_id, observed.id());
                observed
            })
            .map_err(|source| Error::ReplaceIncomplete {
                kind: R::KIND,
                deleted_id: old_id,
                source: Box::new(source),
            })
    }

    /// Delete the resource remotely.
    ///
    /// The local identifier is cleared whatever the outcome, since the
    /// caller's intent was removal. A 404 counts as success.
    ///
    /// # Errors
    ///
    /// Transport and non-404 remote errors are returned after the
    /// identifier has been cleared.
    pub fn delete<R: Resource>(&self, resource: &mut R) -> Result<()> {
        let id = resource.id().to_string();
        if id.is_empty() {
            return Ok(());
        }
        let path = resource.instance_path();
        resource.set_id(String::new());

        debug!("DELETE {}", path);
        let response = self.client.send(Method::Delete, &path, None)?;
        if response.is_not_found() {
            warn!("{} {} was already gone", R::KIND, id);
            return Ok(());
        }
        require_success::<R>(response)?;

        info!("Deleted {} {}", R::KIND, id);
        Ok(())
    }

    /// Plan and execute the change that brings `observed` to `desired`.
    ///
    /// # Errors
    ///
    /// Any planning or lifecycle error.
    pub fn reconcile<R: Resource>(&self, observed: Option<&R>, desired: &R) -> Result<(R, ApplyResult)> {
        let diff = ResourceDiff::compute(observed, desired)?;
        let observed = observed.filter(|o| !o.id().is_empty());

        match (diff.action, observed) {
            (Action::NoChange, Some(current)) => {
                let mut kept = current.clone();
                kept.adopt_local_inputs(desired);
                if R::MUTABILITY != Mutability::ContentGated {
                    kept.set_applied(diff.after);
                }
                Ok((kept, ApplyResult::NoChange))
            }
            (Action::UpdateInPlace, Some(current)) => {
                Ok((self.update(current, desired)?, ApplyResult::Updated))
            }
            (Action::Replace | Action::Reupload, Some(current)) => {
                let previous_id = current.id().to_string();
                Ok((
                    self.update(current, desired)?,
                    ApplyResult::Replaced { previous_id },
                ))
            }
            _ => Ok((self.create(desired)?, ApplyResult::Created)),
        }
    }

    fn submit<R: Resource>(&self, method: Method, path: &str, payload: &Payload) -> Result<RemoteResponse> {
        match payload {
            Payload::Json(body) => {
                let bytes = serde_json::to_vec(body)
                    .map_err(|source| Error::Encode { kind: R::KIND, source })?;
                debug!("{} {} ({} bytes)", method, path, bytes.len());
                self.client.send(method, path, Some(&bytes))
            }
            Payload::Upload(upload) => {
                debug!("{} {} (upload {})", method, path, upload.file_name);
                self.client.upload(path, upload)
            }
        }
    }
}

fn require_success<R: Resource>(response: RemoteResponse) -> Result<RemoteResponse> {
    if response.is_success() {
        Ok(response)
    } else {
        Err(Error::Remote {
            kind: R::KIND,
            status: response.status,
            body: response.body_text(),
        })
    }
}

fn decode<R: Resource>(response: RemoteResponse) -> Result<R::Response> {
    serde_json::from_slice(&response.body).map_err(|source| Error::Decode { kind: R::KIND, source })
}
