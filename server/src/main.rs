use clap::Parser;
use log::{error, info};
use server::config::Args;
use server::fleet::LoggingFleetRegistry;
use server::identity::StubIdentityVerifier;
use server::transport;
use server::{Controller, Hub};
use shared::map::Map;
use shared::world::World;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::RwLock;

#[tokio::main]
async fn main() {
    env_logger::init();
    let args = Args::parse();

    let map_json = std::fs::read_to_string(&args.map_path).unwrap_or_else(|_| {
        info!("server: no map file at {}, starting with an empty arena", args.map_path);
        r#"{"obstacles":[],"spawn_points":[{"x":0.0,"y":0.0}]}"#.to_string()
    });
    let map = Map::from_json(&map_json).unwrap_or_else(|err| {
        error!("server: failed to parse map file, falling back to empty arena: {err}");
        Map::new(vec![], vec![shared::geometry::Point::zero()])
    });

    let world = Arc::new(RwLock::new(World::new(args.region.clone(), map)));
    let (hub, mut disconnects) = Hub::spawn();
    let controller = Controller::new(
        hub,
        world,
        Arc::new(StubIdentityVerifier),
        Arc::new(LoggingFleetRegistry),
        args.tick_rate,
        args.region.clone(),
    );

    let listener = TcpListener::bind(args.bind_address())
        .await
        .expect("failed to bind websocket listener");
    info!(
        "server: listening on {} (region={}, tick_rate={})",
        args.bind_address(),
        args.region,
        args.tick_rate
    );

    {
        let controller = Arc::clone(&controller);
        tokio::spawn(async move {
            while let Some(id) = disconnects.recv().await {
                controller.unregister_player(id).await;
            }
        });
    }

    loop {
        let (stream, addr) = match listener.accept().await {
            Ok(accepted) => accepted,
            Err(err) => {
                error!("server: accept error: {err}");
                continue;
            }
        };

        let controller = Arc::clone(&controller);
        tokio::spawn(async move {
            let ws_stream = match tokio_tungstenite::accept_async(stream).await {
                Ok(ws) => ws,
                Err(err) => {
                    error!("server: websocket handshake failed for {addr}: {err}");
                    return;
                }
            };
            let (reader, writer) = transport::split(ws_stream);
            let id = controller.register_player(Box::new(reader), Box::new(writer)).await;
            info!("server: accepted connection from {addr} as player {id}");
        });
    }
}
