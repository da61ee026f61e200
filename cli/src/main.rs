use anyhow::Result;
use clap::{Parser, Subcommand};
use draco_codec::core::mesh::metadata::Metadata;
use draco_codec::prelude::*;
use draco_geo::pipeline::decode_geo_data;
use draco_geo::server::GeoDataResponse;
use draco_geo::{sample, DracoCodec};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "draco-cli")]
#[command(about = "A CLI tool for Draco mesh compression")]
struct Cli {
    /// Log every decode stage
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Write the sample triangle with primary and secondary uvs
    Sample {
        /// Output file path
        #[arg(short, long)]
        output: PathBuf,

        /// Quantize positions and uvs to this many bits
        #[arg(long)]
        quantization_bits: Option<u8>,
    },
    /// Compress an OBJ file
    Convert {
        /// Input file path
        #[arg(short, long)]
        input: PathBuf,

        /// Output file path
        #[arg(short, long)]
        output: PathBuf,

        /// Quantize positions and texture coordinates to this many bits
        #[arg(long)]
        quantization_bits: Option<u8>,
    },
    /// Decode a compressed mesh and print its vertices, uvs, and secondary uvs
    Dump {
        /// Input file path
        #[arg(short, long)]
        input: PathBuf,

        /// Print the JSON served by the HTTP endpoint instead
        #[arg(long)]
        json: bool,
    },
    /// Print the header, counts, attributes, and metadata of a compressed mesh
    Inspect {
        /// Input file path
        #[arg(short, long)]
        input: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { tracing::Level::DEBUG } else { tracing::Level::WARN };
    tracing_subscriber::fmt().with_max_level(level).with_writer(std::io::stderr).init();

    match cli.command {
        Command::Sample { output, quantization_bits } => write_sample(&output, quantization_bits),
        Command::Convert { input, output, quantization_bits } => convert_obj_to_drc(&input, &output, quantization_bits),
        Command::Dump { input, json } => dump(&input, json),
        Command::Inspect { input } => inspect(&input),
    }
}

fn write_sample(output_path: &Path, quantization_bits: Option<u8>) -> Result<()> {
    let buffer = sample::sample_artifact(quantization_bits)?;
    std::fs::write(output_path, &buffer)
        .map_err(|e| anyhow::anyhow!("Failed to write output file: {}", e))?;
    println!("Wrote {} bytes to {}", buffer.len(), output_path.display());
    Ok(())
}

fn convert_obj_to_drc(input_path: &Path, output_path: &Path, quantization_bits: Option<u8>) -> Result<()> {
    // Check input file extension
    if input_path.extension().and_then(|s| s.to_str()) != Some("obj") {
        anyhow::bail!("Input file must be a .obj file for conversion mode");
    }

    // Check output file extension
    if output_path.extension().and_then(|s| s.to_str()) != Some("drc") {
        anyhow::bail!("Output file must be a .drc file for conversion mode");
    }

    let mesh = draco_codec::io::obj::load_obj(input_path)?;

    // Configure compression settings
    let mut config = encode::Config::default();
    if let Some(bits) = quantization_bits {
        config = config
            .with_quantization(AttributeType::Position, bits)
            .with_quantization(AttributeType::TextureCoordinate, bits);
    }

    // Encode the mesh to a buffer
    let mut buffer = Vec::new();
    encode::encode(&mesh, &mut buffer, config)?;

    // Write to output file
    std::fs::write(output_path, &buffer)
        .map_err(|e| anyhow::anyhow!("Failed to write output file: {}", e))?;
    println!(
        "Encoded {} points and {} faces into {} bytes",
        mesh.num_points(), mesh.num_faces(), buffer.len()
    );

    Ok(())
}

fn dump(input_path: &Path, json: bool) -> Result<()> {
    let data = std::fs::read(input_path)
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", input_path.display(), e))?;
    let geo_data = decode_geo_data(&DracoCodec, &data)?;

    if json {
        let response = GeoDataResponse { geo_data };
        println!("{}", serde_json::to_string_pretty(&response)?);
        return Ok(());
    }

    for (i, p) in geo_data.positions.iter().enumerate() {
        println!("Vertex {}: ({}, {}, {})", i, p.x, p.y, p.z);
    }
    for (i, p) in geo_data.uvs.iter().enumerate() {
        println!("UV {}: ({}, {})", i, p.x, p.y);
    }
    for (i, p) in geo_data.uvs2.iter().enumerate() {
        println!("UV2 {}: ({}, {})", i, p.x, p.y);
    }
    Ok(())
}

fn inspect(input_path: &Path) -> Result<()> {
    let data = std::fs::read(input_path)
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", input_path.display(), e))?;
    let mut buffer = DecoderBuffer::new(&data);
    let geometry_type = encoded_geometry_type(&buffer)?;
    let mesh = decode_mesh(&mut buffer, decode::Config::default())?;

    let attributes = mesh.get_attributes().iter()
        .enumerate()
        .map(|(att_id, att)| serde_json::json!({
            "id": att_id,
            "uniqueId": att.get_id().as_usize(),
            "type": att.get_attribute_type(),
            "componentType": att.get_component_type(),
            "numComponents": att.get_num_components(),
            "normalized": att.is_normalized(),
            "metadata": mesh.attribute_metadata(att_id).map(metadata_to_json),
        }))
        .collect::<Vec<_>>();

    let summary = serde_json::json!({
        "bytes": data.len(),
        "geometryType": geometry_type,
        "numPoints": mesh.num_points(),
        "numFaces": mesh.num_faces(),
        "attributes": attributes,
        "metadata": mesh.get_metadata().map(|m| metadata_to_json(m.metadata())),
    });
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

/// String entries print as strings, 4-byte entries that are not text as ints, and anything else as bytes.
fn metadata_to_json(metadata: &Metadata) -> serde_json::Value {
    let mut out = serde_json::Map::new();
    for (name, value) in metadata.entries() {
        let value = match (std::str::from_utf8(value), metadata.get_entry_int(name)) {
            (Ok(s), _) if s.chars().all(|c| !c.is_control()) => serde_json::json!(s),
            (_, Some(i)) => serde_json::json!(i),
            _ => serde_json::json!(value),
        };
        out.insert(name.to_owned(), value);
    }
    for (name, sub_metadata) in metadata.sub_metadatas() {
        out.insert(name.to_owned(), metadata_to_json(sub_metadata));
    }
    serde_json::Value::Object(out)
}
