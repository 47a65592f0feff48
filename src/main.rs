use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use env_logger::Env;

use studyhall_api::middleware;
use studyhall_api::pricing::PricingConfig;
use studyhall_api::{db, routes};

const HOST: &str = "0.0.0.0";
const PORT: u16 = 8080;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    println!("Application starting...");

    env_logger::init_from_env(Env::default().default_filter_or("info"));
    println!("Logger initialized");

    if cfg!(debug_assertions) {
        dotenv::dotenv().ok();
    } else {
        println!("Release mode");
    }

    let host = std::env::var("HOST").unwrap_or_else(|_| HOST.to_string());
    let port: u16 = std::env::var("PORT")
        .unwrap_or_else(|_| PORT.to_string())
        .parse()
        .unwrap_or(PORT);
    println!("Attempting to bind to {}:{}", host, port);

    let mongo_uri = std::env::var("MONGODB_URI").expect("MONGODB_URI must be set");
    println!("Got MongoDB URI, attempting connection...");
    let client = db::mongo::create_mongo_client(&mongo_uri).await;
    println!("MongoDB connection established");

    let pricing_config = web::Data::new(PricingConfig::standard());

    println!("Starting HTTP server...");

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .route("/health", web::get().to(|| async { "OK" }))
            .app_data(web::Data::new(client.clone()))
            .app_data(pricing_config.clone())
            .service(
                web::scope("/api")
                    .route("/health", web::get().to(routes::health::health_check))
                    // Public routes
                    .service(
                        web::scope("/auth")
                            .route(
                                "/check-email",
                                web::post().to(routes::account::auth::check_email),
                            )
                            .route(
                                "/check-phone",
                                web::post().to(routes::account::auth::check_phone),
                            )
                            .route(
                                "/send-otp",
                                web::post().to(routes::account::email_verification::send_otp),
                            )
                            .route(
                                "/verify-otp",
                                web::post().to(routes::account::email_verification::verify_otp),
                            )
                            .route("/register", web::post().to(routes::account::auth::register))
                            .route("/login", web::post().to(routes::account::auth::login))
                            .route(
                                "/forgot-password",
                                web::post().to(routes::account::password_reset::forgot_password),
                            )
                            .route(
                                "/verify-reset-otp",
                                web::post().to(routes::account::password_reset::verify_reset_otp),
                            )
                            .route(
                                "/reset-password",
                                web::post().to(routes::account::password_reset::reset_password),
                            )
                            .route(
                                "/google",
                                web::get().to(routes::account::google_auth::google_auth_init),
                            )
                            .route(
                                "/google/callback",
                                web::get().to(routes::account::google_auth::google_auth_callback),
                            )
                            .service(
                                web::scope("")
                                    .wrap(middleware::auth::AuthMiddleware)
                                    .route("/me", web::get().to(routes::account::auth::me))
                                    .route("/logout", web::post().to(routes::account::auth::logout)),
                            ),
                    )
                    // Protected routes
                    .service(
                        web::scope("/account")
                            .wrap(middleware::auth::AuthMiddleware)
                            .route(
                                "/membership",
                                web::post().to(routes::account::membership::submit_membership),
                            )
                            .route(
                                "/booking",
                                web::post().to(routes::account::bookings::submit_booking),
                            )
                            .route(
                                "/booking",
                                web::get().to(routes::account::bookings::get_booking),
                            )
                            .route(
                                "/payment",
                                web::post().to(routes::account::bookings::record_payment),
                            ),
                    )
                    .service(
                        web::scope("/pricing")
                            .wrap(middleware::auth::AuthMiddleware)
                            .route("/quote", web::post().to(routes::pricing::quote)),
                    ),
            )
    })
    .bind((host, port))?
    .run()
    .await
}
