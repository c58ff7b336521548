//! Benchmarks comparing sequential and rayon delta localisation

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::Rng;
use shapebake_algorithms::{localize_deltas, DeltaField};
use shapebake_core::{Point3f, Transform3D, UnitQuaternion, Vector3f};

fn generate_grid(size: usize) -> Vec<Point3f> {
    let mut vertices = Vec::with_capacity(size * size);
    for y in 0..size {
        for x in 0..size {
            let fx = x as f32 / (size - 1) as f32 * std::f32::consts::PI;
            let fy = y as f32 / (size - 1) as f32 * std::f32::consts::PI;
            vertices.push(Point3f::new(x as f32, y as f32, (fx.sin() * fy.sin()) * 2.0));
        }
    }
    vertices
}

fn jitter(points: &[Point3f]) -> Vec<Point3f> {
    let mut rng = rand::thread_rng();
    points
        .iter()
        .map(|p| p + Vector3f::new(rng.gen_range(-0.1..0.1), rng.gen_range(-0.1..0.1), rng.gen_range(-0.1..0.1)))
        .collect()
}

fn bench_localize(c: &mut Criterion) {
    let transform = Transform3D::from_parts(
        Vector3f::new(1.0, 2.0, 3.0),
        UnitQuaternion::from_euler_angles(0.3, 0.2, 0.1),
        Vector3f::new(1.5, 1.5, 1.5),
    );
    let to_local = transform.world_to_local_linear().unwrap();

    let mut group = c.benchmark_group("localize_deltas");

    for &size in &[32, 128, 512] {
        let rest = generate_grid(size);
        let current = jitter(&rest);
        let field = DeltaField::compute(&rest, &current, &Transform3D::identity(), usize::MAX).unwrap();
        let vertex_count = rest.len();

        group.bench_with_input(
            BenchmarkId::new("sequential", vertex_count),
            &field.world,
            |b, world| {
                b.iter(|| black_box(localize_deltas(black_box(world), &to_local, usize::MAX)));
            },
        );

        group.bench_with_input(
            BenchmarkId::new("rayon", vertex_count),
            &field.world,
            |b, world| {
                b.iter(|| black_box(localize_deltas(black_box(world), &to_local, 0)));
            },
        );
    }

    group.finish();
}

fn bench_full_field(c: &mut Criterion) {
    let rest = generate_grid(256);
    let current = jitter(&rest);
    let transform = Transform3D::uniform_scaling(2.0);

    c.bench_function("delta_field_65k", |b| {
        b.iter(|| {
            let field = DeltaField::compute(black_box(&rest), black_box(&current), &transform, 4096).unwrap();
            black_box(field.apply_to(&rest).unwrap());
        });
    });
}

criterion_group!(benches, bench_localize, bench_full_field);
criterion_main!(benches);
