use std::hint::black_box;
use std::time::Instant;

use glam::Vec2;
use jenga_common::BlockId;
use jenga_input::{InputEvent, Key};
use jenga_kernel::{JengaConfig, JengaWorld};

fn bench_idle_frames(block_count: usize, iterations: usize) {
    let mut world = JengaWorld::new(JengaConfig::default().with_blocks(block_count));

    let start = Instant::now();
    for _ in 0..iterations {
        black_box(world.frame());
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!(
        "  idle frame ({block_count} blocks, {iterations} iters): {per_iter:?}/iter, total {elapsed:?}"
    );
}

fn bench_controlled_frames(block_count: usize, iterations: usize) {
    let mut world = JengaWorld::new(JengaConfig::default().with_blocks(block_count));
    if world.select(BlockId(block_count / 2)).is_err() {
        return;
    }
    world.push_input(InputEvent::KeyDown(Key::Space));

    let start = Instant::now();
    for _ in 0..iterations {
        black_box(world.frame());
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!(
        "  controlled frame ({block_count} blocks, {iterations} iters): {per_iter:?}/iter, total {elapsed:?}"
    );
}

fn bench_pick(block_count: usize, iterations: usize) {
    let world = JengaWorld::new(JengaConfig::default().with_blocks(block_count));

    let start = Instant::now();
    for i in 0..iterations {
        let x = (i % 21) as f32 / 10.0 - 1.0;
        black_box(world.pick(black_box(Vec2::new(x, 0.0))));
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!(
        "  pick ({block_count} blocks, {iterations} iters): {per_iter:?}/iter, total {elapsed:?}"
    );
}

fn main() {
    println!("=== Sync Loop Benchmarks ===\n");

    println!("Idle frames:");
    bench_idle_frames(18, 600);
    bench_idle_frames(54, 300);
    bench_idle_frames(120, 60);

    println!("\nControlled frames:");
    bench_controlled_frames(54, 300);

    println!("\nPointer picks:");
    bench_pick(54, 10000);
    bench_pick(120, 10000);

    println!("\n=== Done ===");
}
