//! Generates Java builders from a schema and round-trips a sample message.
//!
//! Run with: `cargo run --example generate -- [schema.json] [out-dir]`
//!
//! Without arguments a built-in schema is used and the generated sources
//! are printed instead of written.

use std::path::Path;
use wirebuild::prelude::*;

const SAMPLE: &str = r#"{
    "Amount": {"type": "byte", "size": 8},
    "EntityType": {"type": "enum", "size": 2, "values": []},
    "TransferType": {"type": "enum", "size": 1, "values": [
        {"name": "plain", "value": 0},
        {"name": "tagged", "value": 1}
    ]},
    "EntityBody": {"type": "struct", "layout": [
        {"name": "version", "type": "byte", "size": 1}
    ]},
    "Mosaic": {"type": "struct", "layout": [
        {"name": "mosaicId", "type": "byte", "size": 8},
        {"name": "amount", "type": "Amount"}
    ]},
    "Transfer": {"type": "struct", "layout": [
        {"name": "entityType", "type": "EntityType", "disposition": "const", "value": 16724},
        {"disposition": "inline", "type": "EntityBody"},
        {"name": "recipient", "type": "byte", "size": 24},
        {"name": "transferType", "type": "TransferType"},
        {"name": "tag", "type": "byte", "size": 4, "condition": "transferType",
            "condition_value": "tagged"},
        {"name": "messageSize", "type": "byte", "size": 2},
        {"name": "mosaicsCount", "type": "byte", "size": 1},
        {"name": "message", "type": "byte", "size": "messageSize"},
        {"name": "mosaics", "type": "Mosaic", "size": "mosaicsCount"}
    ]}
}"#;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let mut args = std::env::args().skip(1);
    let options = GeneratorOptions::default();

    match (args.next(), args.next()) {
        (Some(schema), Some(out)) => {
            let paths = generate_to_dir(Path::new(&schema), Path::new(&out), &options)?;
            for path in &paths {
                println!("wrote {}", path.display());
            }
            return Ok(());
        }
        (Some(schema), None) => {
            for file in generate_from_file(Path::new(&schema), &options)? {
                println!("// ---- {}", file.file_name);
                println!("{}", file.contents());
            }
            return Ok(());
        }
        _ => {}
    }

    for file in generate_from_json(SAMPLE, &options)? {
        println!("// ---- {}", file.file_name);
        println!("{}", file.contents());
    }

    let schema = from_json_str(SAMPLE)?;
    let codec = Codec::new(&schema, options.byte_order)?;
    let mosaic = Record::new().with("mosaicId", 0x1122_3344_5566_7788u64).with("amount", 1_000u64);
    let mut transfer = Record::new()
        .with("version", 1u64)
        .with("recipient", vec![0xa5u8; 24])
        .with("transferType", Value::member("TAGGED"))
        .with("message", b"hello".to_vec())
        .with("mosaics", Value::List(vec![Value::Record(mosaic)]));
    codec.set_field("Transfer", &mut transfer, "tag", Value::Int(7))?;

    let bytes = codec.encode("Transfer", &Value::Record(transfer))?;
    tracing::info!(len = bytes.len(), "encoded sample transfer");
    println!("Transfer: {bytes:02x?}");
    println!("Decoded: {:?}", codec.decode("Transfer", &bytes)?);
    println!("EntityType(16724) = {:?}", codec.enum_member("EntityType", 16724)?);

    Ok(())
}
