//! # Georgian Wine Core
//!
//! Offline core of a Georgian wine catalog and tasting-journal app, designed
//! for FFI (Foreign Function Interface) integration with a mobile front-end.
//! Screens, navigation and maps live in the host app; this crate owns the
//! data and the rules.
//!
//! ## Features
//!
//! - **Bundled catalog**: wines, regions, grape varieties, fermentation
//!   methods and wine types, embedded at compile time
//! - **Catalog queries**: category filters plus case-insensitive free-text search
//! - **Localization**: English, Georgian and Russian string tables with
//!   `{placeholder}` substitution and fallback-to-key
//! - **Favorites and journal**: per-session state with a pluggable journal
//!   store (in-memory, discard, or LMDB on disk)
//! - **Safe error handling**: no `unwrap()` calls in production code
//!
//! ## Quick Start
//!
//! ```no_run
//! use georgian_wine_core::{create_session, query_wines, free_response};
//! use std::ffi::CString;
//!
//! let config = CString::new(r#"{"language":"en"}"#).unwrap();
//! let session = create_session(config.as_ptr());
//!
//! let filter = CString::new(r#"{"kind":"region","value":"Kakheti"}"#).unwrap();
//! let result = query_wines(session, filter.as_ptr(), std::ptr::null());
//! free_response(result);
//! ```
//!
//! ## FFI Functions
//!
//! Every function except [`create_session`] returns a JSON-encoded
//! [`AppResponse`] C string that must be released with [`free_response`].
//! On success the `Ok` variant carries a JSON payload.
//!
//! - Session: [`create_session`], [`reset_session`], [`close_session`]
//! - Localization: [`translate`], [`change_language`], [`current_language`]
//! - Catalog: [`query_wines`], [`get_wine`], [`featured_wines`],
//!   [`list_regions`], [`list_grapes`], [`list_methods`], [`list_wine_types`],
//!   [`dataset_issues`]
//! - Favorites: [`toggle_favorite`], [`is_favorite`], [`list_favorites`]
//! - Journal: [`add_journal_entry`], [`delete_journal_entry`],
//!   [`list_journal_entries`], [`search_journal`]

pub mod catalog_query;
pub mod journal_store;
pub mod localization;
pub mod session_config;
pub mod session_state;
pub mod translator;
pub mod wine_dataset;
pub mod wine_model;
mod app_response;

pub use crate::app_response::AppResponse;

use crate::catalog_query::WineFilter;
use crate::localization::Language;
use crate::session_config::SessionConfig;
use crate::session_state::AppSession;
use crate::wine_model::JournalEntryInput;

use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use log::{info, warn};
use serde_json::Value as JsonValue;

const DEFAULT_FEATURED_WINES: usize = 3;

/// Creates a new app session.
///
/// Loads the bundled catalog and string tables (once per process) and opens
/// the configured journal store.
///
/// # Parameters
///
/// * `config_json` - Null-terminated JSON [`SessionConfig`], or null for defaults
///
/// # Returns
///
/// Returns a pointer to the [`AppSession`] on success, or a null pointer on
/// failure. Release it with [`close_session`].
///
/// # Examples
///
/// ```no_run
/// use std::ffi::CString;
/// use georgian_wine_core::create_session;
///
/// let config = CString::new(r#"{"language":"ka","journal":{"backend":"lmdb","path":"journal"}}"#).unwrap();
/// let session = create_session(config.as_ptr());
///
/// if !session.is_null() {
///     // Session ready
/// }
/// ```
///
/// # Errors
///
/// Returns null pointer if:
/// - The config string contains invalid UTF-8 or invalid JSON
/// - The journal store cannot be opened
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn create_session(config_json: *const c_char) -> *mut AppSession {
    let config = if config_json.is_null() {
        SessionConfig::default()
    } else {
        let json = match unsafe { CStr::from_ptr(config_json).to_str() } {
            Ok(s) => s,
            Err(e) => {
                warn!("Invalid UTF-8 in session config: {e}");
                return std::ptr::null_mut();
            }
        };
        match SessionConfig::from_json(json) {
            Ok(config) => config,
            Err(e) => {
                warn!("❌ Invalid session config: {e}");
                return std::ptr::null_mut();
            }
        }
    };

    match AppSession::init(config) {
        Ok(session) => {
            info!("✅ Session initialized successfully");
            Box::into_raw(Box::new(session))
        }
        Err(e) => {
            warn!("❌ Failed to initialize session: {e}");
            std::ptr::null_mut()
        }
    }
}

/// Restores favorites and journal to their seeded state. Language is kept.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn reset_session(session: *mut AppSession) -> *const c_char {
    let session = match session_mut(session, "reset_session") {
        Ok(s) => s,
        Err(err) => return err,
    };

    match session.reset() {
        Ok(()) => response_to_c_string(&AppResponse::success("Session reset successfully")),
        Err(e) => response_to_c_string(&e),
    }
}

/// Ends the session and frees it.
///
/// The pointer must not be used after this call. An LMDB journal is closed
/// when the session is dropped.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn close_session(session: *mut AppSession) -> *const c_char {
    if session.is_null() {
        let error = AppResponse::BadRequest("Null session pointer passed to close_session".to_string());
        return response_to_c_string(&error);
    }

    drop(unsafe { Box::from_raw(session) });
    info!("Session closed");
    response_to_c_string(&AppResponse::success("Session closed successfully"))
}

/// Translates `key` in the session's current language.
///
/// # Parameters
///
/// * `session` - Pointer to the session
/// * `key` - Null-terminated translation key
/// * `params_json` - JSON object of placeholder values, or null
///
/// # Returns
///
/// `Ok` with the translated text as a JSON string. A key with no translation
/// comes back unchanged; placeholders with no value stay in the text.
///
/// # Examples
///
/// ```no_run
/// use std::ffi::CString;
/// use georgian_wine_core::{create_session, translate};
///
/// let session = create_session(std::ptr::null());
/// let key = CString::new("winesCount").unwrap();
/// let params = CString::new(r#"{"count":5}"#).unwrap();
/// let result = translate(session, key.as_ptr(), params.as_ptr());
/// // {"Ok":"\"Showing 5 wines\""}
/// ```
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn translate(session: *mut AppSession, key: *const c_char, params_json: *const c_char) -> *const c_char {
    let session = match session_ref(session, "translate") {
        Ok(s) => s,
        Err(err) => return err,
    };

    let key = match c_ptr_to_string(key, "key") {
        Ok(k) => k,
        Err(err) => return err,
    };

    let params = match optional_c_ptr_to_string(params_json, "params") {
        Ok(None) => Vec::new(),
        Ok(Some(json)) => match parse_params(&json) {
            Ok(params) => params,
            Err(e) => return response_to_c_string(&e),
        },
        Err(err) => return err,
    };

    let text = session.translator().t_with(&key, params);
    response_to_c_string(&AppResponse::json(&text))
}

/// Switches the UI language. Accepts `en`, `ka` or `ru`.
///
/// An unsupported code is rejected with `BadRequest` and the current language
/// stays active.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn change_language(session: *mut AppSession, code: *const c_char) -> *const c_char {
    let session = match session_mut(session, "change_language") {
        Ok(s) => s,
        Err(err) => return err,
    };

    let code = match c_ptr_to_string(code, "language code") {
        Ok(c) => c,
        Err(err) => return err,
    };

    match Language::from_code(&code) {
        Some(language) => {
            session.change_language(language);
            response_to_c_string(&AppResponse::json(&language))
        }
        None => {
            let error = AppResponse::BadRequest(format!("Unsupported language code: {code}"));
            response_to_c_string(&error)
        }
    }
}

#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn current_language(session: *mut AppSession) -> *const c_char {
    match session_ref(session, "current_language") {
        Ok(s) => response_to_c_string(&AppResponse::json(&s.current_language())),
        Err(err) => err,
    }
}

/// Returns the wines matching a category filter and optional search text.
///
/// # Parameters
///
/// * `session` - Pointer to the session
/// * `filter_json` - Filter object, or null for all wines
/// * `search_text` - Text from the list's search box, or null
///
/// # Filter Format
///
/// ```json
/// {"kind": "all"}
/// {"kind": "region", "value": "Kakheti"}
/// {"kind": "grape",  "value": "Tsolikouri"}
/// {"kind": "type",   "value": "Amber"}
/// {"kind": "method", "value": "Qvevri"}
/// {"kind": "search", "text": "qvevri"}
/// ```
///
/// Unknown kinds are treated as `all`. Results keep catalog order.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn query_wines(session: *mut AppSession, filter_json: *const c_char, search_text: *const c_char) -> *const c_char {
    let session = match session_ref(session, "query_wines") {
        Ok(s) => s,
        Err(err) => return err,
    };

    let filter = match optional_c_ptr_to_string(filter_json, "filter") {
        Ok(None) => WineFilter::All,
        Ok(Some(json)) => match serde_json::from_str::<WineFilter>(&json) {
            Ok(f) => f,
            Err(e) => {
                let error = AppResponse::SerializationError(format!("Invalid filter JSON: {e}"));
                return response_to_c_string(&error);
            }
        },
        Err(err) => return err,
    };

    let search_text = match optional_c_ptr_to_string(search_text, "search text") {
        Ok(text) => text,
        Err(err) => return err,
    };

    let wines = session.query_wines(&filter, search_text.as_deref());
    response_to_c_string(&AppResponse::json(&wines))
}

#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn get_wine(session: *mut AppSession, id: *const c_char) -> *const c_char {
    let session = match session_ref(session, "get_wine") {
        Ok(s) => s,
        Err(err) => return err,
    };

    let id = match c_ptr_to_string(id, "id") {
        Ok(id) => id,
        Err(err) => return err,
    };

    match session.wine(&id) {
        Some(wine) => response_to_c_string(&AppResponse::json(wine)),
        None => response_to_c_string(&AppResponse::NotFound(format!("No wine found with id: {id}"))),
    }
}

/// Highest-rated wines. `limit` of zero means the home-screen default of 3.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn featured_wines(session: *mut AppSession, limit: u32) -> *const c_char {
    let session = match session_ref(session, "featured_wines") {
        Ok(s) => s,
        Err(err) => return err,
    };

    let limit = if limit == 0 { DEFAULT_FEATURED_WINES } else { limit as usize };
    response_to_c_string(&AppResponse::json(&session.featured_wines(limit)))
}

#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn list_regions(session: *mut AppSession) -> *const c_char {
    match session_ref(session, "list_regions") {
        Ok(s) => response_to_c_string(&AppResponse::json(&s.dataset().regions)),
        Err(err) => err,
    }
}

#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn list_grapes(session: *mut AppSession) -> *const c_char {
    match session_ref(session, "list_grapes") {
        Ok(s) => response_to_c_string(&AppResponse::json(&s.dataset().grape_varieties)),
        Err(err) => err,
    }
}

#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn list_methods(session: *mut AppSession) -> *const c_char {
    match session_ref(session, "list_methods") {
        Ok(s) => response_to_c_string(&AppResponse::json(&s.dataset().fermentation_methods)),
        Err(err) => err,
    }
}

#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn list_wine_types(session: *mut AppSession) -> *const c_char {
    match session_ref(session, "list_wine_types") {
        Ok(s) => response_to_c_string(&AppResponse::json(&s.dataset().wine_types)),
        Err(err) => err,
    }
}

/// Wines whose region, fermentation method or type names nothing in the catalog.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn dataset_issues(session: *mut AppSession) -> *const c_char {
    match session_ref(session, "dataset_issues") {
        Ok(s) => response_to_c_string(&AppResponse::json(&s.dataset().reference_issues())),
        Err(err) => err,
    }
}

/// Adds or removes a wine from favorites.
///
/// Returns `Ok` with `{"wineId": "...", "favorite": bool}` describing the new
/// state. Unknown ids are accepted; they never show up in [`list_favorites`].
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn toggle_favorite(session: *mut AppSession, wine_id: *const c_char) -> *const c_char {
    let session = match session_mut(session, "toggle_favorite") {
        Ok(s) => s,
        Err(err) => return err,
    };

    let wine_id = match c_ptr_to_string(wine_id, "wine id") {
        Ok(id) => id,
        Err(err) => return err,
    };

    let favorite = session.toggle_favorite(&wine_id);
    let payload = serde_json::json!({ "wineId": wine_id, "favorite": favorite });
    response_to_c_string(&AppResponse::json(&payload))
}

#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn is_favorite(session: *mut AppSession, wine_id: *const c_char) -> *const c_char {
    let session = match session_ref(session, "is_favorite") {
        Ok(s) => s,
        Err(err) => return err,
    };

    match c_ptr_to_string(wine_id, "wine id") {
        Ok(id) => response_to_c_string(&AppResponse::json(&session.is_favorite(&id))),
        Err(err) => err,
    }
}

#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn list_favorites(session: *mut AppSession) -> *const c_char {
    match session_ref(session, "list_favorites") {
        Ok(s) => response_to_c_string(&AppResponse::json(&s.favorite_wines())),
        Err(err) => err,
    }
}

/// Adds a journal entry for a catalog wine.
///
/// # JSON Format
///
/// ```json
/// {
///   "wineId": "3",
///   "date": "2024-09-01",
///   "rating": 4.5,
///   "notes": "...",
///   "occasion": "...",
///   "location": "..."
/// }
/// ```
///
/// Only `wineId` is required; `date` defaults to today and `rating` to 5.
///
/// # Returns
///
/// `Ok` with the stored entry, including its assigned id, or `NotFound` when
/// `wineId` is not in the catalog.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn add_journal_entry(session: *mut AppSession, json_ptr: *const c_char) -> *const c_char {
    let session = match session_mut(session, "add_journal_entry") {
        Ok(s) => s,
        Err(err) => return err,
    };

    let json_str = match c_ptr_to_string(json_ptr, "JSON") {
        Ok(json) => json,
        Err(err) => return err,
    };

    let input: JournalEntryInput = match serde_json::from_str(&json_str) {
        Ok(i) => i,
        Err(e) => {
            let error = AppResponse::SerializationError(format!("Invalid JSON: {e}"));
            return response_to_c_string(&error);
        }
    };

    match session.add_journal_entry(input) {
        Ok(entry) => response_to_c_string(&AppResponse::json(&entry)),
        Err(e) => response_to_c_string(&e),
    }
}

/// Deletes a journal entry by id.
///
/// Deleting an id that does not exist is not an error; the payload is `true`
/// when an entry was removed and `false` otherwise.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn delete_journal_entry(session: *mut AppSession, id: *const c_char) -> *const c_char {
    let session = match session_mut(session, "delete_journal_entry") {
        Ok(s) => s,
        Err(err) => return err,
    };

    let id = match c_ptr_to_string(id, "id") {
        Ok(id) => id,
        Err(err) => return err,
    };

    match session.delete_journal_entry(&id) {
        Ok(removed) => response_to_c_string(&AppResponse::json(&removed)),
        Err(e) => response_to_c_string(&e),
    }
}

#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn list_journal_entries(session: *mut AppSession) -> *const c_char {
    let session = match session_ref(session, "list_journal_entries") {
        Ok(s) => s,
        Err(err) => return err,
    };

    match session.journal_entries() {
        Ok(entries) => response_to_c_string(&AppResponse::json(&entries)),
        Err(e) => response_to_c_string(&e),
    }
}

/// Journal entries joined with their wine and filtered by `query`
/// (null or empty for all).
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn search_journal(session: *mut AppSession, query: *const c_char) -> *const c_char {
    let session = match session_ref(session, "search_journal") {
        Ok(s) => s,
        Err(err) => return err,
    };

    let query = match optional_c_ptr_to_string(query, "query") {
        Ok(q) => q.unwrap_or_default(),
        Err(err) => return err,
    };

    match session.search_journal(&query) {
        Ok(views) => response_to_c_string(&AppResponse::json(&views)),
        Err(e) => response_to_c_string(&e),
    }
}

/// Releases a string returned by any function of this library.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn free_response(ptr: *const c_char) {
    if ptr.is_null() {
        return;
    }
    drop(unsafe { CString::from_raw(ptr as *mut c_char) });
}

/// Converts an [`AppResponse`] to a C-compatible string.
///
/// Returns a null pointer if serialization or C string creation fails.
fn response_to_c_string(response: &AppResponse) -> *const c_char {
    let json = match serde_json::to_string(response) {
        Ok(j) => j,
        Err(e) => {
            warn!("Error serializing response: {e}");
            return std::ptr::null();
        }
    };

    match CString::new(json) {
        Ok(c_str) => c_str.into_raw(),
        Err(e) => {
            warn!("Error creating CString: {e}");
            std::ptr::null()
        }
    }
}

/// Converts a C string pointer to a Rust String.
///
/// * `Ok(String)` - If conversion was successful
/// * `Err(*const c_char)` - Ready-to-return `BadRequest` response for a null
///   pointer or invalid UTF-8
fn c_ptr_to_string(ptr: *const c_char, field_name: &str) -> Result<String, *const c_char> {
    if ptr.is_null() {
        let error = AppResponse::BadRequest(format!("Null {field_name} pointer"));
        return Err(response_to_c_string(&error));
    }

    match unsafe { CStr::from_ptr(ptr).to_str() } {
        Ok(s) => Ok(s.to_string()),
        Err(e) => {
            let error = AppResponse::BadRequest(format!("Invalid UTF-8 in {field_name}: {e}"));
            Err(response_to_c_string(&error))
        }
    }
}

/// Like [`c_ptr_to_string`], but a null pointer means "not given".
fn optional_c_ptr_to_string(ptr: *const c_char, field_name: &str) -> Result<Option<String>, *const c_char> {
    if ptr.is_null() {
        return Ok(None);
    }
    c_ptr_to_string(ptr, field_name).map(Some)
}

fn session_ref<'a>(session: *mut AppSession, caller: &str) -> Result<&'a AppSession, *const c_char> {
    match unsafe { session.as_ref() } {
        Some(s) => Ok(s),
        None => {
            let error = AppResponse::BadRequest(format!("Null session pointer passed to {caller}"));
            Err(response_to_c_string(&error))
        }
    }
}

fn session_mut<'a>(session: *mut AppSession, caller: &str) -> Result<&'a mut AppSession, *const c_char> {
    match unsafe { session.as_mut() } {
        Some(s) => Ok(s),
        None => {
            let error = AppResponse::BadRequest(format!("Null session pointer passed to {caller}"));
            Err(response_to_c_string(&error))
        }
    }
}

/// Flattens a JSON object of placeholder values into `(name, text)` pairs.
/// Strings are used as-is; numbers, booleans and null use their JSON text.
fn parse_params(json: &str) -> Result<Vec<(String, String)>, AppResponse> {
    match serde_json::from_str::<JsonValue>(json)? {
        JsonValue::Object(map) => Ok(map
            .into_iter()
            .map(|(name, value)| {
                let text = match value {
                    JsonValue::String(s) => s,
                    other => other.to_string(),
                };
                (name, text)
            })
            .collect()),
        JsonValue::Null => Ok(Vec::new()),
        _ => Err(AppResponse::BadRequest("Translation params must be a JSON object".to_string())),
    }
}
