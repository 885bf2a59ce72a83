pub mod api_client;
pub mod auth_service;
pub mod collection_service;
pub mod http;
pub mod mutation_service;

pub use api_client::ApiClient;
pub use auth_service::{OtpAuthFlow, OtpStage};
pub use collection_service::{
    BookingsSource, CollectionClient, CollectionSource, FetchOutcome, VaccinesSource,
};
pub use http::{HttpResponse, Transport};
pub use mutation_service::{apply_booking_action, MutationService, PictureFile, PictureUpload};

#[cfg(target_arch = "wasm32")]
pub use http::GlooTransport;
