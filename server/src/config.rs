//! Process configuration: CLI flags layered over environment variables,
//! in the teacher's `clap`-derive idiom (`server/src/main.rs::Args`).

use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Authoritative tank arena game server")]
pub struct Args {
    /// Public IP address advertised to the fleet registry.
    #[arg(long, env = "PUBLIC_IP", default_value = "localhost")]
    pub public_ip: String,

    /// TCP port the WebSocket listener binds to.
    #[arg(long, env = "PORT", default_value_t = 80)]
    pub port: u16,

    /// Region tag reported to the fleet registry; required.
    #[arg(long, env = "REGION")]
    pub region: String,

    /// gRPC endpoint of the master server / fleet registry.
    #[arg(long, env = "MASTERSERVER_GRPC")]
    pub masterserver_grpc: Option<String>,

    /// Fixed simulation tick rate in Hz.
    #[arg(long, default_value_t = 30)]
    pub tick_rate: u32,

    /// Path to the map JSON file (see `shared::map::Map::from_json`).
    #[arg(long, default_value = "map.json")]
    pub map_path: String,
}

impl Args {
    pub fn bind_address(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bind_address_uses_configured_port() {
        let args = Args {
            public_ip: "localhost".into(),
            port: 9001,
            region: "eu-west".into(),
            masterserver_grpc: None,
            tick_rate: 30,
            map_path: "map.json".into(),
        };
        assert_eq!(args.bind_address(), "0.0.0.0:9001");
    }
}
