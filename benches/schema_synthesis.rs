//! Benchmarks for schema synthesis and tool definition encoding
//!
//! This benchmark measures:
//! - Synthesis of scalar, array and nested composite types
//! - Descriptor creation (synthesis plus signature checks)
//! - Manifest loading into a toolset

use ai_lib_tools::codec::encode_tool_definition;
use ai_lib_tools::function::{FunctionDescriptor, ParameterSpec};
use ai_lib_tools::schema::{
    IntegerKind, ObjectType, ParameterType, SchemaSynthesizer, StringFormat, TypeTable,
};
use ai_lib_tools::toolset::ToolManifest;
use ai_lib_tools::ToolsConfig;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::sync::Arc;

const SAMPLE_MANIFEST_YAML: &str = r#"
types:
  Address:
    members:
      - { name: street, type: { kind: string, of: plain } }
      - { name: city, type: { kind: string, of: plain } }
      - { name: zip, type: { kind: integer, of: u32 } }
  Customer:
    members:
      - { name: id, type: { kind: string, of: guid } }
      - { name: name, type: { kind: string, of: plain } }
      - { name: since, type: { kind: string, of: date_time } }
      - { name: addresses, type: { kind: array, of: { kind: named, of: Address } } }
tools:
  - name: create_order
    description: Create an order for a customer
    parameters:
      - { name: customer, type: { kind: named, of: Customer } }
      - { name: quantity, type: { kind: integer, of: u16 } }
      - { name: priority, type: { kind: enum, of: [low, normal, high] }, optional: true }
  - name: to_fahrenheit
    description: Convert Celsius to Fahrenheit
    parameters:
      - { name: celsius, type: { kind: float, of: f64 } }
"#;

fn nested_table(depth: usize) -> TypeTable {
    let mut table = TypeTable::new();
    for level in 0..depth {
        let mut object = ObjectType::new()
            .member("label", ParameterType::string())
            .member("weight", ParameterType::float());
        if level + 1 < depth {
            object = object.member("child", ParameterType::named(format!("Level{}", level + 1)));
        }
        table.register(format!("Level{}", level), object);
    }
    table
}

fn bench_scalar_synthesis(c: &mut Criterion) {
    let synthesizer = SchemaSynthesizer::new();
    let types = vec![
        ("boolean", ParameterType::boolean()),
        ("u8", ParameterType::integer(IntegerKind::U8)),
        ("guid", ParameterType::formatted(StringFormat::Guid)),
        ("enum", ParameterType::enumeration(["low", "normal", "high"])),
        (
            "array_i32",
            ParameterType::array(ParameterType::integer(IntegerKind::I32)),
        ),
    ];

    let mut group = c.benchmark_group("scalar_synthesis");
    for (name, ty) in &types {
        group.bench_with_input(BenchmarkId::new("type", name), ty, |b, ty| {
            b.iter(|| synthesizer.synthesize(black_box(ty), Some("value")).unwrap())
        });
    }
    group.finish();
}

fn bench_nested_synthesis(c: &mut Criterion) {
    let mut group = c.benchmark_group("nested_synthesis");
    for depth in [2usize, 8, 24] {
        let synthesizer = SchemaSynthesizer::new().with_table(Arc::new(nested_table(depth)));
        let root = ParameterType::named("Level0");
        group.bench_with_input(BenchmarkId::new("depth", depth), &root, |b, root| {
            b.iter(|| synthesizer.synthesize(black_box(root), None).unwrap())
        });
    }
    group.finish();
}

fn bench_descriptor_encoding(c: &mut Criterion) {
    let params = vec![
        ParameterSpec::required("celsius", ParameterType::float()),
        ParameterSpec::optional("unit", ParameterType::enumeration(["C", "F"])),
        ParameterSpec::required(
            "readings",
            ParameterType::array(ParameterType::integer(IntegerKind::I64)),
        ),
    ];

    let mut group = c.benchmark_group("descriptor");
    group.bench_function("declare", |b| {
        b.iter(|| FunctionDescriptor::declare("convert", "Convert", black_box(params.clone())).unwrap())
    });

    let descriptor = FunctionDescriptor::declare("convert", "Convert", params.clone()).unwrap();
    group.bench_function("encode_tool_definition", |b| {
        b.iter(|| encode_tool_definition(black_box(&descriptor)))
    });
    group.finish();
}

fn bench_manifest_loading(c: &mut Criterion) {
    let mut group = c.benchmark_group("manifest");
    group.throughput(Throughput::Bytes(SAMPLE_MANIFEST_YAML.len() as u64));
    group.bench_function("yaml_to_definitions", |b| {
        b.iter(|| {
            let manifest = ToolManifest::from_yaml_str(black_box(SAMPLE_MANIFEST_YAML)).unwrap();
            let toolset = manifest.into_toolset(ToolsConfig::default()).unwrap();
            black_box(toolset.definitions_json())
        })
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_scalar_synthesis,
    bench_nested_synthesis,
    bench_descriptor_encoding,
    bench_manifest_loading,
);
criterion_main!(benches);
