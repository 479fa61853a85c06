use criterion::{black_box, criterion_group, criterion_main, Criterion};
use std::{fs::File, io::Write};
use tempfile::tempdir;
use textscout::{run_scan, ScanRequest};

fn create_test_files(
    dir: &tempfile::TempDir,
    file_count: usize,
    lines_per_file: usize,
) -> std::io::Result<()> {
    for i in 0..file_count {
        let file_path = dir.path().join(format!("dump_{}.txt", i));
        let mut file = File::create(file_path)?;
        for j in 0..lines_per_file {
            writeln!(
                file,
                "{},user{}@example.com,{:x},active,2024-01-{:02}",
                j,
                j,
                j * 7919,
                j % 28 + 1
            )?;
        }
        if i % 10 == 0 {
            writeln!(file, "{},target@example.com,deadbeef,active,2024-02-01", i)?;
        }
    }
    Ok(())
}

fn bench_file_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("File Scaling");
    for file_count in [1, 10, 100, 1000] {
        let dir = tempdir().unwrap();
        create_test_files(&dir, file_count, 100).unwrap();
        let request = ScanRequest::new("target@example.com", dir.path(), ["txt"]).unwrap();

        group.bench_function(format!("files_{}", file_count), |b| {
            b.iter(|| black_box(run_scan(&request).unwrap()));
        });
    }
    group.finish();
}

fn bench_large_file(c: &mut Criterion) {
    let dir = tempdir().unwrap();
    create_test_files(&dir, 1, 200_000).unwrap();
    let hit = ScanRequest::new("target@example.com", dir.path(), ["txt"]).unwrap();
    let miss = ScanRequest::new("nobody@example.com", dir.path(), ["txt"]).unwrap();

    let mut group = c.benchmark_group("Large File");
    group.sample_size(20);
    group.bench_function("match_at_end", |b| {
        b.iter(|| black_box(run_scan(&hit).unwrap()));
    });
    group.bench_function("no_match", |b| {
        b.iter(|| black_box(run_scan(&miss).unwrap()));
    });
    group.finish();
}

criterion_group!(benches, bench_file_scaling, bench_large_file);
criterion_main!(benches);
