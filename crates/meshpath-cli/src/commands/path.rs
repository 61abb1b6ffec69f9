use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use meshpath_core::read_stl;
use meshpath_paths::{LogRecorder, MarkerStyle, MeshGraph, PathResult, ResolveConfig, VertexId};
use serde::Serialize;

use crate::args::PathArgs;
use crate::error::CliError;

/// Where the path markers for `stl` go: the full file name with
/// `_path.stl` appended, next to the input.
pub fn output_path(stl: &Path) -> PathBuf {
    let mut name = OsString::from(stl.as_os_str());
    name.push("_path.stl");
    PathBuf::from(name)
}

#[derive(Serialize)]
struct Summary<'a> {
    stl: &'a Path,
    vertices: usize,
    edges: usize,
    begin: VertexId,
    goal: VertexId,
    found: bool,
    result: &'a PathResult,
}

/// Load a mesh and search once; the summary goes to `out`.
pub fn run(
    args: &PathArgs,
    config: &ResolveConfig,
    out: &mut dyn Write,
) -> Result<PathResult, CliError> {
    let graph = load_graph(&args.stl)?;

    if let Some(dot) = &args.graphviz {
        fs::write(dot, graph.to_graphviz()).map_err(CliError::write(dot))?;
        log::info!("wrote {}", dot.display());
    }

    let begin = args.from.resolve(&graph, config)?;
    let goal = args.to.resolve(&graph, config)?;
    log::info!(
        "searching {begin} ({}) -> {goal} ({})",
        graph.position(begin),
        graph.position(goal)
    );

    let result = graph.dijkstra_with(begin, goal, &mut LogRecorder);
    log::info!("{}", result.to_string().trim_end());

    if args.json {
        let summary = Summary {
            stl: &args.stl,
            vertices: graph.vertex_count(),
            edges: graph.edge_count(),
            begin,
            goal,
            found: result.found(),
            result: &result,
        };
        serde_json::to_writer_pretty(&mut *out, &summary)?;
        writeln!(out)?;
    } else {
        write!(out, "{result}")?;
    }

    if !args.no_render {
        let target = output_path(&args.stl);
        let file = File::create(&target).map_err(CliError::write(&target))?;
        let mut writer = BufWriter::new(file);
        result
            .write_marker_stl(&mut writer, &MarkerStyle::default())
            .and_then(|()| writer.flush())
            .map_err(CliError::write(&target))?;
        log::info!("wrote {} markers to {}", result.len(), target.display());
    }

    Ok(result)
}

/// Read an STL file and build its graph, logging sizes and timings.
pub(crate) fn load_graph(stl: &Path) -> Result<MeshGraph, CliError> {
    let started = Instant::now();
    let mesh = read_stl(stl)?;
    log::info!(
        "{}: {:?} solid `{}`, {} triangles, read in {:.3}ms",
        stl.display(),
        mesh.format,
        mesh.name,
        mesh.triangles.len(),
        started.elapsed().as_secs_f64() * 1000.0
    );
    if mesh.triangles.is_empty() {
        return Err(CliError::EmptyMesh(stl.to_path_buf()));
    }

    let started = Instant::now();
    let graph = MeshGraph::from_triangles(&mesh.triangles);
    log::info!(
        "graph: {} vertices, {} edges, built in {:.3}ms",
        graph.vertex_count(),
        graph.edge_count(),
        started.elapsed().as_secs_f64() * 1000.0
    );
    Ok(graph)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args::Endpoint;
    use crate::commands::tests::write_box;
    use meshpath_core::{Point3, parse_stl};
    use meshpath_paths::PathError;
    use tempfile::tempdir;

    fn args(stl: PathBuf, from: Endpoint, to: Endpoint) -> PathArgs {
        PathArgs {
            stl,
            from,
            to,
            json: false,
            no_render: false,
            graphviz: None,
        }
    }

    #[test]
    fn output_name_appends_to_full_file_name() {
        assert_eq!(
            output_path(Path::new("models/Box1x1x1.stl")),
            PathBuf::from("models/Box1x1x1.stl_path.stl")
        );
        assert_eq!(output_path(Path::new("mesh")), PathBuf::from("mesh_path.stl"));
    }

    #[test]
    fn finds_path_and_writes_markers() {
        let dir = tempdir().unwrap();
        let stl = write_box(dir.path());
        let a = args(
            stl.clone(),
            Endpoint::Point(Point3::ZERO),
            Endpoint::Point(Point3::new(1.0, 1.0, 1.0)),
        );

        let mut out = Vec::new();
        let result = run(&a, &ResolveConfig::default(), &mut out).unwrap();
        assert!(result.found());
        assert!((result.length() - (1.0 + std::f64::consts::SQRT_2)).abs() < 1e-9);
        assert_eq!(String::from_utf8(out).unwrap(), result.to_string());

        let markers = parse_stl(&fs::read(output_path(&stl)).unwrap()).unwrap();
        assert_eq!(markers.name, "PathScene");
        assert_eq!(markers.triangles.len(), result.len());
    }

    #[test]
    fn json_and_graphviz() {
        let dir = tempdir().unwrap();
        let stl = write_box(dir.path());
        let dot = dir.path().join("box.dot");
        let mut a = args(stl.clone(), Endpoint::Index(0), Endpoint::Index(0));
        a.json = true;
        a.no_render = true;
        a.graphviz = Some(dot.clone());

        let mut out = Vec::new();
        run(&a, &ResolveConfig::default(), &mut out).unwrap();
        let json: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(json["vertices"], 8);
        assert_eq!(json["edges"], 18);
        assert_eq!(json["found"], true);
        assert_eq!(json["result"]["length"], 0.0);
        assert_eq!(json["result"]["path"].as_array().unwrap().len(), 1);

        assert!(fs::read_to_string(&dot).unwrap().starts_with("# "));
        assert!(!output_path(&stl).exists());
    }

    #[test]
    fn unmatched_point_fails() {
        let dir = tempdir().unwrap();
        let stl = write_box(dir.path());
        let a = args(
            stl,
            Endpoint::Point(Point3::new(0.5, 0.5, 0.5)),
            Endpoint::Index(1),
        );
        let err = run(&a, &ResolveConfig::default(), &mut Vec::new()).unwrap_err();
        assert!(matches!(err, CliError::Path(PathError::NoMatchingVertex { .. })));
    }

    #[test]
    fn missing_file_fails() {
        let a = args(
            PathBuf::from("/nonexistent/meshpath/box.stl"),
            Endpoint::Index(0),
            Endpoint::Index(1),
        );
        let err = run(&a, &ResolveConfig::default(), &mut Vec::new()).unwrap_err();
        assert!(err.to_string().starts_with("failed to read /nonexistent/meshpath/box.stl"));
    }
}
