use mongodb::{
    options::{ClientOptions, ServerApi, ServerApiVersion},
    Client, Collection,
};
use std::sync::Arc;
use std::time::Duration;

use crate::models::member::Member;

pub const DB_NAME: &str = "studyhall";

pub async fn create_mongo_client(uri: &String) -> Arc<Client> {
    println!("Connecting to MongoDB: {}", uri);

    let mut client_options = ClientOptions::parse(uri)
        .await
        .expect("MongoDB URI may be incorrect! Failed to parse.");

    client_options.connect_timeout = Some(Duration::from_secs(10));
    client_options.server_selection_timeout = Some(Duration::from_secs(10));
    client_options.max_pool_size = Some(10);
    client_options.min_pool_size = Some(1);

    let server_api = ServerApi::builder().version(ServerApiVersion::V1).build();
    client_options.server_api = Some(server_api);

    let client =
        Client::with_options(client_options).expect("Failed to create MongoDB client with options");

    // Ping once so a bad deployment fails at startup, not on the first signup
    match client
        .database(DB_NAME)
        .run_command(mongodb::bson::doc! {"ping": 1})
        .await
    {
        Ok(_) => println!("Successfully connected to MongoDB"),
        Err(e) => eprintln!("WARNING: MongoDB ping failed: {}", e),
    }

    Arc::new(client)
}

/// The members collection every route works against.
pub fn members(client: &Client) -> Collection<Member> {
    client.database(DB_NAME).collection("members")
}
