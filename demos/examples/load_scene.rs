// Copyright 2026 the Cube Loader Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Load a multi-resolution cube scene and inspect its index.
//!
//! With a directory argument, reads `scene.json` and its level documents from
//! that directory. Without one, loads a small generated three-level pyramid
//! held in memory.
//!
//! Run:
//! - `cargo run -p cube_loader_demos --example load_scene`
//! - `cargo run -p cube_loader_demos --example load_scene -- path/to/scene`

use cube_octree::{Aabb3D, dump_to_string};
use cube_query::{
    DirectorySource, DocumentSource, LevelStatus, MemorySource, Scene, SceneError, SceneLoader,
};

fn main() {
    let scene = match std::env::args().nth(1) {
        Some(dir) => load(&DirectorySource::new(dir)),
        None => load(&pyramid()),
    };
    let scene = match scene {
        Ok(scene) => scene,
        Err(err) => {
            eprintln!("failed to load scene: {err}");
            std::process::exit(1);
        }
    };

    for (level, result) in scene.levels() {
        match result.status() {
            LevelStatus::Loaded => {
                let dims = result.dims().unwrap_or_default();
                let cell = result.cell_size();
                println!(
                    "level {level}: {}x{}x{} grid, {} cubes, scale {}/{}, cell {:.2}x{:.2}x{:.2}",
                    dims.x,
                    dims.y,
                    dims.z,
                    result.volume_count(),
                    result.scale().xy,
                    result.scale().z,
                    cell.x,
                    cell.y,
                    cell.z,
                );
            }
            LevelStatus::Empty(reason) => println!("level {level}: empty ({reason})"),
        }
    }

    let index = scene.index();
    println!(
        "global index: {} volumes in {} nodes",
        index.len(),
        index.node_count()
    );

    let region = Aabb3D::new(0.0, 0.0, 0.0, 1.0, 1.0, 1.0);
    let mut hits: Vec<_> = index.query_region(&region).map(|v| *v.payload()).collect();
    hits.sort_unstable();
    println!("cubes touching {region}:");
    for id in hits {
        println!("  {id}");
    }

    if index.len() <= 64 {
        print!("{}", dump_to_string(index));
    }
}

fn load(source: &impl DocumentSource) -> Result<Scene, SceneError> {
    pollster::block_on(SceneLoader::new("scene.json").load(source))
}

/// Three levels of a solid block, from 4x2x4 cells down to 1x1x1.
fn pyramid() -> MemorySource {
    let mut source = MemorySource::new().with(
        "scene.json",
        r#"{
            "MinimumViewport": 0,
            "MaximumViewport": 2,
            "MetadataTemplate": "levels/v{v}.json",
            "CubeTemplate": "cubes/v{v}/{x}_{y}_{z}.obj"
        }"#,
    );
    for (level, n) in [(0_u32, 4_u32), (1, 2), (2, 1)] {
        let ny = n.div_ceil(2);
        let row = vec![true; n as usize];
        let cells = vec![vec![row; ny as usize]; n as usize];
        let cells = format!("{cells:?}");
        source.insert(
            format!("levels/v{level}.json"),
            format!(
                r#"{{
                    "GridSize": {{"X": {n}, "Y": {ny}, "Z": {n}}},
                    "CubeExists": {cells},
                    "Extents": {{"XMin": 0, "YMin": 0, "ZMin": 0,
                                 "XMax": 64, "YMax": 32, "ZMax": 64,
                                 "XSize": 64, "YSize": 32, "ZSize": 64}}
                }}"#
            ),
        );
    }
    source
}
