//! RPC method handler for the Smartmarks JSON-RPC protocol.
//!
//! Extracted from `rpc_server.rs` so it can be unit-tested independently.
//! The `handle_method` function dispatches JSON-RPC method calls to the
//! identity provider and the mounted dashboard sessions via the `App`
//! struct.

use serde_json::{json, Value};

use crate::app::App;
use crate::managers::bookmark_list::ListSnapshot;
use crate::managers::dashboard::DashboardHandle;
use crate::types::bookmark::Bookmark;

fn bookmark_json(b: &Bookmark) -> Value {
    json!({
        "id": b.id,
        "user_id": b.user_id,
        "title": b.title,
        "url": b.url,
        "created_at": b.created_at,
    })
}

/// Renders a snapshot as the row array the UI binds to, each row carrying
/// its delete-in-flight flag.
fn snapshot_json(snapshot: &ListSnapshot) -> Value {
    let arr: Vec<Value> = snapshot
        .bookmarks
        .iter()
        .map(|b| {
            let mut row = bookmark_json(b);
            row["deleting"] = json!(snapshot.deleting.contains(&b.id));
            row
        })
        .collect();
    json!(arr)
}

/// Resolves the dashboard handle a request addresses via its `mount_id`.
fn dashboard(app: &App, params: &Value) -> Result<DashboardHandle, String> {
    let mount_id = params
        .get("mount_id")
        .and_then(|v| v.as_str())
        .ok_or("missing mount_id")?;
    app.dashboard(mount_id)
        .ok_or_else(|| format!("unknown mount: {}", mount_id))
}

/// Dispatch a JSON-RPC method call to the appropriate handler.
///
/// Returns `Ok(Value)` on success or `Err(String)` with an error message.
pub async fn handle_method(app: &App, method: &str, params: &Value) -> Result<Value, String> {
    match method {
        // ─── Identity ───
        "auth.user" => {
            let user = app.identity.current_user().map_err(|e| e.to_string())?;
            Ok(json!({"id": user.id, "email": user.email}))
        }

        // ─── Dashboard lifecycle ───
        "dashboard.mount" => {
            let (mount_id, handle) = app.mount_dashboard().await.map_err(|e| e.to_string())?;
            let snapshot = handle.snapshot().await.map_err(|e| e.to_string())?;
            Ok(json!({"mount_id": mount_id, "bookmarks": snapshot_json(&snapshot)}))
        }
        "dashboard.unmount" => {
            let mount_id = params
                .get("mount_id")
                .and_then(|v| v.as_str())
                .ok_or("missing mount_id")?;
            if app.unmount_dashboard(mount_id).await {
                Ok(json!({"ok": true}))
            } else {
                Err(format!("unknown mount: {}", mount_id))
            }
        }

        // ─── Bookmarks ───
        "bookmark.add" => {
            let title = params
                .get("title")
                .and_then(|v| v.as_str())
                .ok_or("missing title")?;
            let url = params
                .get("url")
                .and_then(|v| v.as_str())
                .ok_or("missing url")?;
            let handle = dashboard(app, params)?;
            let row = handle.create(title, url).await.map_err(|e| e.to_string())?;
            Ok(bookmark_json(&row))
        }
        "bookmark.delete" => {
            let id = params
                .get("id")
                .and_then(|v| v.as_str())
                .ok_or("missing id")?;
            // Destructive action: the caller must confirm explicitly, the
            // way the UI puts a confirm dialog in front of the button.
            if params.get("confirm").and_then(|v| v.as_bool()) != Some(true) {
                return Err("confirmation required: pass \"confirm\": true".to_string());
            }
            let handle = dashboard(app, params)?;
            handle.delete(id).await.map_err(|e| e.to_string())?;
            Ok(json!({"ok": true}))
        }
        "bookmark.list" => {
            let handle = dashboard(app, params)?;
            let snapshot = handle.snapshot().await.map_err(|e| e.to_string())?;
            Ok(snapshot_json(&snapshot))
        }

        // ─── Ping ───
        "ping" => Ok(json!({"pong": true})),

        _ => Err(format!("unknown method: {}", method)),
    }
}
