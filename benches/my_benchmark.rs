use criterion::{black_box, criterion_group, criterion_main, Criterion};
use graphica_curves::geometry_utilities::sqr_distance_bezier_point;
use graphica_curves::geometry_utilities::types::*;
use graphica_curves::path::Path;
use graphica_curves::CurveSegment;
use kurbo::CubicBez;
use kurbo::ParamCurveArclen;
use kurbo::Point as KurboPoint;
use rand::prelude::*;
use rand::SeedableRng;

fn random_path(rng: &mut StdRng, curves: usize) -> Path {
    let mut p = point(0.0, 0.0);
    let mut segments = vec![];
    for _ in 0..curves {
        let c1 = p + vector(rng.gen_range(-10.0..10.0), rng.gen_range(-10.0..10.0));
        let end = p + vector(rng.gen_range(5.0..20.0), rng.gen_range(-10.0..10.0));
        let c2 = end + vector(rng.gen_range(-10.0..10.0), rng.gen_range(-10.0..10.0));
        segments.push(CurveSegment::new(p, c1, c2, end));
        p = end;
    }
    Path::from_curves(segments, false).unwrap()
}

fn sqr_distance_bezier_point_bench(points: &[CanvasPoint]) {
    for i in 0..100 {
        let bezier = graphica_curves::geometry_utilities::cubic(&[points[i], points[i + 1], points[i + 2], points[i + 3]]);
        let k = sqr_distance_bezier_point(&bezier, points[i + 4]);
        black_box(k);
    }
}

fn path_point_at_length(path: &Path) {
    for i in 0..100 {
        let k = path.point_at_length(path.length() * i as f64 / 100.0);
        black_box(k);
    }
}

fn path_closest_t(path: &Path, queries: &[CanvasPoint]) {
    for q in queries {
        let k = path.closest_t(*q);
        black_box(k);
    }
}

fn bezier_arclen(bez: &CubicBez) {
    for _ in 0..10 {
        let k = bez.arclen(0.1);
        black_box(k);
    }
}

pub fn criterion_benchmark(c: &mut Criterion) {
    let mut rng: StdRng = SeedableRng::seed_from_u64(0);
    let mut points = vec![];
    for _ in 0..100 {
        for _ in 0..5 {
            points.push(point(rng.gen(), rng.gen()));
        }
    }
    c.bench_function("sqr_distance_bezier_point", |b| {
        b.iter(|| sqr_distance_bezier_point_bench(&points))
    });

    let path = random_path(&mut rng, 200);
    let queries: Vec<CanvasPoint> = (0..10)
        .map(|_| point(rng.gen_range(0.0..2000.0), rng.gen_range(-50.0..50.0)))
        .collect();
    c.bench_function("path_point_at_length", |b| b.iter(|| path_point_at_length(&path)));
    c.bench_function("path_closest_t", |b| b.iter(|| path_closest_t(&path, &queries)));
    c.bench_function("path_sub_path", |b| {
        b.iter(|| black_box(path.sub_path(black_box(0.8), black_box(0.15))))
    });

    let bezier = CubicBez::new(
        KurboPoint::new(0.0, 10.0),
        KurboPoint::new(10.0, 30.0),
        KurboPoint::new(5.0, 20.0),
        KurboPoint::new(0.0, 20.0),
    );
    c.bench_function("bezier_arclen", |b| b.iter(|| bezier_arclen(&bezier)));
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
