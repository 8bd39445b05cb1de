// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use regex::Regex;
use shopfloor_bnb::bnb::BnbSolver;
use shopfloor_bnb::branching::priority::PriorityBuilder;
use shopfloor_bnb::eval::combined::CombinedBound;
use shopfloor_bnb::monitor::wrapper::WrapperMonitor;
use shopfloor_model::loading::ProblemLoader;
use shopfloor_model::model::Model;
use shopfloor_search::monitor::node_limit::NodeLimitMonitor;
use std::fs;
use std::hint::black_box;
use std::path::{Path, PathBuf};
use std::sync::atomic::AtomicU64;

/// Caps every iteration so that a hard instance cannot stall the run.
const NODE_LIMIT: u64 = 200_000;

fn find_instances_dir() -> Option<PathBuf> {
    let mut cur: Option<&Path> = Some(Path::new(env!("CARGO_MANIFEST_DIR")));
    while let Some(p) = cur {
        let cand = p.join("data");
        if cand.is_dir() {
            return Some(cand);
        }
        cur = p.parent();
    }
    None
}

/// Gathers all instance files matching "^[a-z]+\d+\.txt$".
fn get_instance_files() -> Vec<PathBuf> {
    let dir = find_instances_dir().expect("Could not find 'data/' directory");

    let re = Regex::new(r"^[a-z]+\d+\.txt$").unwrap();

    let mut files: Vec<PathBuf> = fs::read_dir(dir)
        .expect("Failed to read data directory")
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| {
            p.file_name()
                .and_then(|n| n.to_str())
                .map(|s| re.is_match(s))
                .unwrap_or(false)
        })
        .collect();

    // Sort for deterministic benchmark order
    files.sort();
    files
}

fn solve_once(solver: &mut BnbSolver<i64>, model: &Model<i64>) -> Option<i64> {
    let nodes = AtomicU64::new(0);
    let mut limit = NodeLimitMonitor::new(&nodes, NODE_LIMIT);
    let mut builder = PriorityBuilder::preallocated(model.num_jobs());
    let mut evaluator = CombinedBound::standard();
    let outcome = solver.solve(
        model,
        &mut builder,
        &mut evaluator,
        WrapperMonitor::new(&mut limit),
    );
    outcome.best_schedule().map(|s| s.makespan())
}

fn bench_instances(c: &mut Criterion) {
    let files = get_instance_files();
    if files.is_empty() {
        eprintln!("No instance files found in data/ matching pattern. Skipping benchmark.");
        return;
    }

    let loader = ProblemLoader::new();
    let group_re = Regex::new(r"^([a-z]+)").unwrap();
    let mut group = c.benchmark_group("bnb_benchmark");
    group.sample_size(10);

    for path in files {
        let file_name = path.file_name().unwrap().to_string_lossy().to_string();
        let model: Model<i64> = loader
            .from_path(&path)
            .unwrap_or_else(|e| panic!("Failed to load {}: {}", file_name, e));

        let family = group_re
            .captures(&file_name)
            .map(|caps| caps[1].to_string())
            .unwrap_or_else(|| "unknown".to_string());

        let mut solver = BnbSolver::preallocated(model.num_jobs(), model.num_operations());
        if solve_once(&mut solver, &model).is_none() {
            panic!("Benchmark configuration error: no schedule found for {}.", file_name);
        }

        group.throughput(Throughput::Elements(model.num_operations() as u64));
        group.bench_with_input(BenchmarkId::new(&family, &file_name), &model, |b, model| {
            b.iter(|| black_box(solve_once(&mut solver, black_box(model))))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_instances);
criterion_main!(benches);
