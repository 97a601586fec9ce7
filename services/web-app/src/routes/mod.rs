use axum::{
    routing::{delete, get, post, put},
    Router,
};

use crate::{handlers::*, AppState};

pub fn create_chat_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/ask", post(ask))
        .route("/get_history", get(get_history))
        .route("/edit_message/:index", put(edit_message))
        .route("/delete_message/:index", delete(delete_message))
        .route("/clear_chat", delete(clear_chat))
}

pub fn create_user_data_routes() -> Router<AppState> {
    Router::new()
        .route("/save_profile", get(get_profile).post(save_profile))
        .route("/save_medication", get(get_medications).post(save_medication))
        .route("/delete_medication/:index", delete(delete_medication))
        .route(
            "/save_emergency_contact",
            get(get_emergency_contacts).post(save_emergency_contact),
        )
        .route("/delete_emergency_contact/:index", delete(delete_emergency_contact))
}

pub fn create_pdf_routes() -> Router<AppState> {
    Router::new()
        .route("/upload_pdf", post(upload_pdf))
        .route("/get_pdfs", get(get_pdfs))
        .route("/get_pdf/:id", get(get_pdf))
        .route("/delete_pdf/:id", delete(delete_pdf))
        .route("/ask_pdf/:id", post(ask_pdf))
}
