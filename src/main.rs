#![recursion_limit = "256"]

#[cfg(feature = "ssr")]
#[tokio::main]
async fn main() {
    use axum::Router;
    use campus_portal::app::*;
    use campus_portal::core::ReqwestTransport;
    use campus_portal::core::config::Config;
    use campus_portal::core::proxy::proxy_router;
    use leptos::logging::log;
    use leptos::prelude::*;
    use leptos_axum::{
        LeptosRoutes, file_and_error_handler_with_context,
        generate_route_list_with_exclusions_and_ssg_and_context,
    };
    use tower_http::compression::{CompressionLayer, CompressionLevel};
    use tower_http::services::ServeDir;

    // Load .env file (if exists)
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    let config = Config::from_env();
    tracing::info!(
        "Config loaded: backend={}, default_backend={}, timeout={:?}",
        config.backend_url,
        config.uses_default_backend(),
        config.backend_timeout()
    );

    let transport = match ReqwestTransport::new(&config.backend_url) {
        Ok(transport) => transport,
        Err(e) => {
            tracing::error!("Invalid BACKEND_URL {}: {}", config.backend_url, e);
            std::process::exit(1);
        }
    };
    let api_proxy = match proxy_router(&config) {
        Ok(router) => router,
        Err(e) => {
            tracing::error!("Failed to set up API proxy: {}", e);
            std::process::exit(1);
        }
    };

    // Load configuration from Cargo.toml [package.metadata.leptos]
    // Can be overridden via LEPTOS_SITE_ADDR env var for Docker/K8s
    let conf = match get_configuration(None) {
        Ok(conf) => conf,
        Err(e) => {
            tracing::error!("Failed to load Leptos configuration: {}", e);
            std::process::exit(1);
        }
    };
    let leptos_options = conf.leptos_options;
    let addr = leptos_options.site_addr;

    let context = {
        let transport = transport.clone();
        move || provide_context(transport.clone())
    };

    let (routes, _) =
        generate_route_list_with_exclusions_and_ssg_and_context(App, None, context.clone());

    // Serves .br and .gz variants when present
    let pkg_service = ServeDir::new(format!("{}/pkg", leptos_options.site_root))
        .precompressed_br()
        .precompressed_gzip();

    let leptos_router = Router::new()
        .nest_service("/pkg", pkg_service)
        .leptos_routes_with_context(&leptos_options, routes, context.clone(), {
            let leptos_options = leptos_options.clone();
            move || shell(leptos_options.clone())
        })
        .fallback(file_and_error_handler_with_context(context, shell))
        .with_state(leptos_options);

    let app = Router::new()
        // /api/* is forwarded to the backend
        .merge(api_proxy)
        .merge(leptos_router)
        .layer(
            CompressionLayer::new()
                .br(true)
                .gzip(true)
                .quality(CompressionLevel::Best),
        );

    log!("listening on http://{}", &addr);
    log!("API requests forwarded to {}", &config.backend_url);

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("Failed to bind {}: {}", addr, e);
            std::process::exit(1);
        }
    };
    if let Err(e) = axum::serve(listener, app.into_make_service()).await {
        tracing::error!("Server error: {}", e);
    }
}

#[cfg(not(feature = "ssr"))]
pub fn main() {
    // no client-side main function
    // see lib.rs for hydration function instead
}
