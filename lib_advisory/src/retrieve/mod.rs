pub mod api_http;
