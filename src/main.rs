use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use draco_codec::prelude::ConfigType;
use draco_geo::server::{self, Config};
use draco_geo::DracoCodec;

#[derive(Parser)]
#[command(name = "draco-geo-server")]
#[command(about = "Serves the positions and uvs of a Draco mesh as JSON")]
struct Cli {
    /// Compressed mesh file (default: build/compressed_mesh.drc)
    #[arg(long)]
    mesh: Option<PathBuf>,

    /// Port on localhost (default: 3000)
    #[arg(long)]
    port: Option<u16>,

    /// Log every decode stage
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { tracing::Level::DEBUG } else { tracing::Level::INFO };
    tracing_subscriber::fmt().with_max_level(level).init();

    let mut cfg = Config::default();
    if let Some(mesh) = cli.mesh {
        cfg.mesh_path = mesh;
    }
    if let Some(port) = cli.port {
        cfg.port = port;
    }

    server::serve(DracoCodec, cfg).await?;
    Ok(())
}
