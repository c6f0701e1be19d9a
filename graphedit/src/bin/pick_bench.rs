use graphedit::{Graph, GraphType, Link, Node, Rect, Vec2};
use std::time::Instant;

fn build_grid_graph(edges_target: usize) -> Graph {
    let mut g = Graph::new(GraphType::Directed);
    // Grid of nodes spaced wider than a node; connect horizontally until ~edges_target
    let w = 60usize; let h = 60usize;
    let mut nodes = Vec::with_capacity(w*h);
    for j in 0..h { for i in 0..w { nodes.push(g.add_node(Node::at(Vec2::new(i as f64 * 80.0, j as f64 * 70.0)))); } }
    let mut ecount = 0usize;
    'outer: for j in 0..h { for i in 0..(w-1) {
        let mut l = Link::regular(nodes[j*w+i], nodes[j*w+i+1]);
        // Every other link is bent so arcs are exercised too
        if let Link::Regular { bend, .. } = &mut l { if ecount % 2 == 1 { bend.perpendicular = 12.0; } }
        if g.add_link(l).is_ok() { ecount+=1; }
        if ecount>=edges_target { break 'outer; }
    } }
    g
}

fn percentile(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() { return 0.0; }
    let idx = ((sorted.len() as f64 - 1.0) * p).round() as usize;
    sorted[idx.min(sorted.len()-1)]
}

fn main() {
    let args: Vec<String> = std::env::args().collect();
    let mut edges = 2000usize;
    let mut picks = 5000usize;
    let mut assert_ms: Option<f64> = None;
    for a in &args[1..] {
        if let Some(val)=a.strip_prefix("--edges=") { if let Ok(v)=val.parse() { edges=v; } }
        else if let Some(val)=a.strip_prefix("--picks=") { if let Ok(v)=val.parse() { picks=v; } }
        else if let Some(val)=a.strip_prefix("--assert-ms=") { if let Ok(v)=val.parse() { assert_ms=Some(v); } }
    }

    let g = build_grid_graph(edges);

    // Pick points cycle across the grid, alternating node centers and link midpoints
    let mut times_ms: Vec<f64> = Vec::with_capacity(picks);
    let start_all = Instant::now();
    let mut hits = 0usize;
    for k in 0..picks {
        let x = (k % 50) as f64 * 80.0 + if k % 2 == 0 { 0.0 } else { 40.0 };
        let y = ((k/50) % 50) as f64 * 70.0;
        let t0 = Instant::now();
        if g.object_at(Vec2::new(x, y), true).is_some() { hits += 1; }
        times_ms.push(t0.elapsed().as_secs_f64() * 1000.0);
    }
    let dur_all = start_all.elapsed().as_secs_f64() * 1000.0;

    let t0 = Instant::now();
    let in_rect = g.objects_in_rectangle(&Rect::new(Vec2::new(-50.0, -50.0), Vec2::new(1200.0, 1000.0))).len();
    let rect_ms = t0.elapsed().as_secs_f64() * 1000.0;

    times_ms.sort_by(|a,b| a.total_cmp(b));
    let med = percentile(&times_ms, 0.5);
    let p90 = percentile(&times_ms, 0.9);
    let p99 = percentile(&times_ms, 0.99);
    println!("edges={} picks={} hits={} total_ms={:.3} median_ms={:.4} p90_ms={:.4} p99_ms={:.4} rect_objs={} rect_ms={:.3}",
        g.edge_count(), picks, hits, dur_all, med, p90, p99, in_rect, rect_ms);
    if let Some(th) = assert_ms { if med > th { eprintln!("FAIL: median {:.4} ms > threshold {:.3} ms", med, th); std::process::exit(1); } }
}
