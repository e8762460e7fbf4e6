// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod errors;
pub mod generate;
pub mod handlers;
pub mod history;
pub mod http_server;

pub use errors::{ApiError, ErrorResponse};
pub use generate::{generate_handler, GenerateRequest, GenerateResponse};
pub use handlers::{health_handler, root_handler, EndpointList, HealthResponse, RootResponse};
pub use history::{history_handler, HistoryQuery, HistoryResponse};
pub use http_server::{build_router, start_server, AppState};
