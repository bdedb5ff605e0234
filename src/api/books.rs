//! Book endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::{Query, WithRejection};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::{AppError, AppResult, ErrorResponse},
    models::book::{Book, BookPayload, BookQuery, BookShort},
};

use super::MessageResponse;

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookIdData {
    pub book_id: String,
}

/// Response to a successful creation
#[derive(Serialize, ToSchema)]
pub struct AddBookResponse {
    pub status: String,
    pub message: String,
    pub data: BookIdData,
}

#[derive(Serialize, ToSchema)]
pub struct BookListData {
    pub books: Vec<BookShort>,
}

#[derive(Serialize, ToSchema)]
pub struct BookListResponse {
    pub status: String,
    pub data: BookListData,
}

#[derive(Serialize, ToSchema)]
pub struct BookDetailData {
    pub book: Book,
}

#[derive(Serialize, ToSchema)]
pub struct BookDetailResponse {
    pub status: String,
    pub data: BookDetailData,
}

/// Add a book to the shelf
#[utoipa::path(
    post,
    path = "/add-book",
    tag = "books",
    request_body = BookPayload,
    responses(
        (status = 201, description = "Book added", body = AddBookResponse),
        (status = 400, description = "Missing name or readPage larger than pageCount", body = ErrorResponse)
    )
)]
pub async fn add_book(
    State(state): State<crate::AppState>,
    WithRejection(Json(data), _): WithRejection<Json<BookPayload>, AppError>,
) -> AppResult<(StatusCode, Json<AddBookResponse>)> {
    let book_id = state.services.books.add(data).await?;

    Ok((
        StatusCode::CREATED,
        Json(AddBookResponse {
            status: "success".to_string(),
            message: "Buku berhasil ditambahkan".to_string(),
            data: BookIdData { book_id },
        }),
    ))
}

/// List books, optionally filtered
#[utoipa::path(
    get,
    path = "/book",
    tag = "books",
    params(BookQuery),
    responses(
        (status = 200, description = "Matching books", body = BookListResponse)
    )
)]
pub async fn list_books(
    State(state): State<crate::AppState>,
    WithRejection(Query(query), _): WithRejection<Query<BookQuery>, AppError>,
) -> AppResult<Json<BookListResponse>> {
    let books = state.services.books.list(&query).await;

    Ok(Json(BookListResponse {
        status: "success".to_string(),
        data: BookListData { books },
    }))
}

/// Get book details by ID
#[utoipa::path(
    get,
    path = "/book/{id}",
    tag = "books",
    params(
        ("id" = String, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Book details", body = BookDetailResponse),
        (status = 404, description = "Book not found", body = ErrorResponse)
    )
)]
pub async fn get_book(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<BookDetailResponse>> {
    let book = state.services.books.get_by_id(&id).await?;

    Ok(Json(BookDetailResponse {
        status: "success".to_string(),
        data: BookDetailData { book },
    }))
}

/// Update an existing book
#[utoipa::path(
    put,
    path = "/book/{id}",
    tag = "books",
    params(
        ("id" = String, Path, description = "Book ID")
    ),
    request_body = BookPayload,
    responses(
        (status = 200, description = "Book updated", body = MessageResponse),
        (status = 404, description = "Book not found", body = ErrorResponse)
    )
)]
pub async fn update_book(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
    WithRejection(Json(data), _): WithRejection<Json<BookPayload>, AppError>,
) -> AppResult<Json<MessageResponse>> {
    state.services.books.update(&id, data).await?;
    Ok(Json(MessageResponse::success("Buku berhasil diperbarui")))
}

/// Delete a book
#[utoipa::path(
    delete,
    path = "/book/{id}",
    tag = "books",
    params(
        ("id" = String, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Book deleted", body = MessageResponse),
        (status = 404, description = "Book not found", body = ErrorResponse)
    )
)]
pub async fn delete_book(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    state.services.books.delete(&id).await?;
    Ok(Json(MessageResponse::success("Buku berhasil dihapus")))
}
