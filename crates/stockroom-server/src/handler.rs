use axum::body::Body;
use axum::extract::multipart::MultipartRejection;
use axum::extract::rejection::{FormRejection, JsonRejection};
use axum::extract::{Multipart, Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Json};
use axum::Form;
use serde::{Deserialize, Serialize};
use stockroom_store::{Inventory, PhotoUpload};
use stockroom_types::{InventoryRecord, RecordId, RecordPatch};
use tokio_util::io::ReaderStream;
use tracing::{debug, warn};

use crate::error::{ServerError, ServerResult};
use crate::form::{FilePart, FormFields};

/// Form value browsers send for a checked checkbox.
const CHECKBOX_ON: &str = "on";

#[derive(Debug, Deserialize)]
pub struct SearchForm {
    pub id: Option<String>,
    #[serde(rename = "includePhoto")]
    pub include_photo: Option<String>,
}

/// Record payload returned by `/search`.
#[derive(Debug, Serialize)]
pub struct SearchResult {
    #[serde(flatten)]
    pub record: InventoryRecord,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
}

/// Path clients use to download a record's photo.
pub fn photo_url(id: &RecordId) -> String {
    format!("/inventory/{id}/photo")
}

/// `GET /inventory`
pub async fn list_handler(State(inventory): State<Inventory>) -> ServerResult<Json<Vec<InventoryRecord>>> {
    let records = inventory.list().await?;
    debug!(count = records.len(), "listed inventory");
    Ok(Json(records))
}

/// `GET /inventory/:id`
pub async fn get_handler(
    State(inventory): State<Inventory>,
    Path(id): Path<String>,
) -> ServerResult<Json<InventoryRecord>> {
    Ok(Json(inventory.get(&RecordId::from(id)).await?))
}

/// `POST /register` with a multipart body of `inventory_name`, `description`
/// and an optional `photo` file.
pub async fn register_handler(
    State(inventory): State<Inventory>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ServerResult<impl IntoResponse> {
    let multipart = multipart.map_err(|e| ServerError::Upload(e.body_text()))?;
    let fields = FormFields::from_multipart(multipart).await?;

    let name = fields.first("inventory_name").unwrap_or_default();
    if name.trim().is_empty() {
        return Err(ServerError::Validation("inventory_name is required".into()));
    }
    let description = fields.first("description").unwrap_or_default();
    let photo = fields.first_file("photo").map(photo_upload);

    let record = inventory.register(name, description, photo).await?;
    Ok((
        StatusCode::CREATED,
        format!("Registered inventory item {}", record.id),
    ))
}

fn photo_upload(part: &FilePart) -> PhotoUpload {
    let extension = part
        .filename
        .clone()
        .filter(|f| f.contains('.'))
        .or_else(|| {
            part.content_type
                .as_deref()
                .and_then(|ct| ct.strip_prefix("image/"))
                .map(|sub| sub.split('+').next().unwrap_or(sub).to_string())
        });
    PhotoUpload::new(part.data.clone(), extension)
}

/// `POST /search` with a url-encoded body of `id` and `includePhoto`.
///
/// A missing or empty `id` is a failed lookup and answers 404.
pub async fn search_handler(
    State(inventory): State<Inventory>,
    form: Result<Form<SearchForm>, FormRejection>,
) -> ServerResult<Json<SearchResult>> {
    let Form(form) = form.map_err(|e| {
        warn!(error = %e, "rejected search form");
        ServerError::MalformedBody(e.body_text())
    })?;
    let id = form
        .id
        .filter(|id| !id.is_empty())
        .map(RecordId::from)
        .ok_or_else(|| ServerError::NotFound("no inventory item id given".into()))?;

    let record = inventory.get(&id).await?;
    let wants_photo = form.include_photo.as_deref() == Some(CHECKBOX_ON);
    let photo_url = (wants_photo && record.photo.is_some()).then(|| photo_url(&record.id));
    Ok(Json(SearchResult { record, photo_url }))
}

/// `PUT /inventory/:id` with a JSON body of optional `name` and `description`.
pub async fn update_handler(
    State(inventory): State<Inventory>,
    Path(id): Path<String>,
    patch: Result<Json<RecordPatch>, JsonRejection>,
) -> ServerResult<String> {
    let id = RecordId::from(id);
    let patch = match patch {
        Ok(Json(patch)) => patch,
        Err(e) => {
            // An unknown id is still a 404, whatever the body looks like.
            inventory.get(&id).await?;
            warn!(id = %id, error = %e, "rejected update body");
            return Err(ServerError::MalformedBody(e.body_text()));
        }
    };
    inventory.update(&id, &patch).await?;
    Ok(format!("Updated inventory item {id}"))
}

/// `DELETE /inventory/:id`
pub async fn delete_handler(
    State(inventory): State<Inventory>,
    Path(id): Path<String>,
) -> ServerResult<String> {
    let id = RecordId::from(id);
    inventory.remove(&id).await?;
    Ok(format!("Deleted inventory item {id}"))
}

/// `GET /inventory/:id/photo`, streamed from the photo store.
pub async fn photo_handler(
    State(inventory): State<Inventory>,
    Path(id): Path<String>,
) -> ServerResult<impl IntoResponse> {
    let content = inventory.photo(&RecordId::from(id)).await?;
    let body = Body::from_stream(ReaderStream::new(content.reader));
    Ok(([(header::CONTENT_TYPE, content.content_type)], body))
}

/// Fallback for unknown routes and methods.
pub async fn not_found_handler() -> ServerError {
    ServerError::NotFound("Not Found".into())
}
