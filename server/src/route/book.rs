use crate::controller::Controller;
use crate::error::ErrorStatus;
use crate::handler::AppModule;
use crate::request::{
    BookRequest, BookTransformer, DeleteBookRequest, GetAllBookRequest, GetBookRequest,
    SearchBookRequest,
};
use crate::response::BookPresenter;
use application::service::{
    CreateBookService, DeleteBookService, GetBookService, SearchBookService, UpdateBookService,
};
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};

pub trait BookRouter {
    fn route_book(self) -> Self;
}

impl BookRouter for Router<AppModule> {
    fn route_book(self) -> Self {
        self.route(
            "/books",
            get(
                |State(module): State<AppModule>,
                 query: Result<Query<GetAllBookRequest>, QueryRejection>| async move {
                    let req = match query {
                        Ok(Query(req)) => req,
                        Err(rejection) => return Err(ErrorStatus::from(rejection)),
                    };
                    Controller::new(BookTransformer, BookPresenter)
                        .intake(req)
                        .handle(|page| async move {
                            match page {
                                Some(page) => module.database().get_books_paginated(page).await,
                                None => module.database().get_all_books().await,
                            }
                        })
                        .await
                        .map_err(ErrorStatus::from)
                },
            )
            .post(
                |State(module): State<AppModule>,
                 body: Result<Json<BookRequest>, JsonRejection>| async move {
                    let req = match body {
                        Ok(Json(req)) => req,
                        Err(rejection) => return Err(ErrorStatus::from(rejection)),
                    };
                    Controller::new(BookTransformer, BookPresenter)
                        .intake(req)
                        .handle(|dto| async move { module.database().create_book(dto).await })
                        .await
                        .map(|created| (StatusCode::CREATED, created))
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/books/search",
            get(
                |State(module): State<AppModule>,
                 query: Result<Query<SearchBookRequest>, QueryRejection>| async move {
                    let req = match query {
                        Ok(Query(req)) => req,
                        Err(rejection) => return Err(ErrorStatus::from(rejection)),
                    };
                    Controller::new(BookTransformer, BookPresenter)
                        .intake(req)
                        .handle(|dto| async move { module.database().search_books(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/books/:id",
            get(
                |State(module): State<AppModule>, Path(id): Path<String>| async move {
                    Controller::new(BookTransformer, BookPresenter)
                        .intake(GetBookRequest::new(id))
                        .handle(|dto| async move { module.database().get_book(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            )
            .put(
                |State(module): State<AppModule>,
                 Path(id): Path<String>,
                 body: Result<Json<BookRequest>, JsonRejection>| async move {
                    let req = match body {
                        Ok(Json(req)) => req,
                        Err(rejection) => return Err(ErrorStatus::from(rejection)),
                    };
                    Controller::new(BookTransformer, BookPresenter)
                        .intake((id, req))
                        .handle(|dto| async move { module.database().update_book(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            )
            .delete(
                |State(module): State<AppModule>, Path(id): Path<String>| async move {
                    Controller::new(BookTransformer, BookPresenter)
                        .intake(DeleteBookRequest::new(id))
                        .handle(|dto| async move { module.database().delete_book(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
    }
}
