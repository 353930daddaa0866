//! Walks through the life of a `GrowArr`: growth, pop, copy and move.
//!
//! Storage events are logged at `trace` level alongside the regular output.

use growarr::GrowArr;
use log::LevelFilter;
use simple_logger::SimpleLogger;

fn report(name: &str, arr: &GrowArr<i32>) {
    println!("{name}: {arr:?} (size: {}, capacity: {})", arr.len(), arr.capacity());
}

fn main() {
    let _ = SimpleLogger::new()
        .with_level(LevelFilter::Trace)
        .without_timestamps()
        .init();

    let mut v = GrowArr::new();
    v.push(10);
    v.push(20);
    v.push(30);
    report("v", &v);

    for x in &v {
        print!("{x} ");
    }
    println!();

    match v.pop() {
        Ok(popped) => println!("popped {popped}, size now {}", v.len()),
        Err(err) => println!("pop failed: {err}"),
    }

    let v2 = v.clone();
    let v3 = v.take();
    report("v (moved from)", &v);
    report("v2 (copy)", &v2);
    report("v3 (moved to)", &v3);

    match v2.at(0) {
        Ok(first) => println!("v2[0]: {first}"),
        Err(err) => println!("v2[0]: {err}"),
    }

    if let Err(err) = v.pop() {
        println!("pop on v: {err}");
    }
    if let Err(err) = v3.at(5) {
        println!("v3.at(5): {err}");
    }
}
