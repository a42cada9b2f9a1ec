use std::cmp::Reverse;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use cursor::Endian;
use navcodec_tools::{
    decode_mesh_at, format_mesh_pretty, inspect_mesh, roundtrip_mesh, MeshReport,
};
use navmesh::DecodeLimits;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "navcodec-tools",
    version,
    about = "navmesh inspection and round-trip tools"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

/// Where the mesh sits inside a file.
#[derive(Args, Clone, Copy)]
struct Placement {
    /// Byte offset of the mesh start.
    #[arg(long, default_value_t = 0)]
    offset: usize,
    /// Decode as big-endian.
    #[arg(long)]
    big_endian: bool,
}

impl Placement {
    fn endian(self) -> Endian {
        Endian::from_big_endian_flag(self.big_endian)
    }
}

#[derive(Subcommand)]
enum Command {
    /// Summarize mesh headers and record counts.
    Inspect {
        /// Path to a mesh file or a directory of them.
        mesh_path: PathBuf,
        #[command(flatten)]
        placement: Placement,
        /// Optional glob filter when inspecting a directory.
        #[arg(long)]
        glob: Option<String>,
        /// Sort inspected meshes.
        #[arg(long, value_enum)]
        sort: Option<InspectSort>,
        /// Limit the number of inspected meshes (after sorting).
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Decode, re-encode and compare against the input bytes.
    Roundtrip {
        /// Path to the mesh file.
        mesh_file: PathBuf,
        #[command(flatten)]
        placement: Placement,
    },
    /// Print the decoded mesh graph.
    Dump {
        /// Path to the mesh file.
        mesh_file: PathBuf,
        #[command(flatten)]
        placement: Placement,
        /// Output format.
        #[arg(long, value_enum, default_value_t = DumpFormat::Json)]
        format: DumpFormat,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum InspectSort {
    Size,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum DumpFormat {
    Json,
    Pretty,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let limits = DecodeLimits::default();
    match cli.command {
        Command::Inspect {
            mesh_path,
            placement,
            glob,
            sort,
            limit,
        } => {
            if mesh_path.is_dir() {
                let mut entries = list_meshes(&mesh_path, glob.as_deref())?;
                if let Some(InspectSort::Size) = sort {
                    entries.sort_by_key(|entry| Reverse(entry.size));
                }
                entries.truncate(limit.unwrap_or(usize::MAX));
                info!(count = entries.len(), "inspecting directory");
                for entry in entries {
                    let bytes = read_mesh(&entry.path)?;
                    println!("== {} ({} bytes) ==", entry.path.display(), entry.size);
                    match inspect_mesh(&bytes, placement.offset, placement.endian(), &limits) {
                        Ok(report) => print_inspect_report(&report),
                        Err(err) => {
                            warn!(path = %entry.path.display(), "skipping undecodable mesh");
                            println!("error: {err:#}");
                        }
                    }
                }
            } else {
                let bytes = read_mesh(&mesh_path)?;
                let report = inspect_mesh(&bytes, placement.offset, placement.endian(), &limits)?;
                print_inspect_report(&report);
            }
        }
        Command::Roundtrip {
            mesh_file,
            placement,
        } => {
            let bytes = read_mesh(&mesh_file)?;
            let report = roundtrip_mesh(&bytes, placement.offset, placement.endian(), &limits)?;
            match report.first_mismatch {
                None => println!("identical: {} bytes", report.encoded_len),
                Some(at) => bail!(
                    "mismatch at mesh offset {at} (file offset {}) of {} encoded bytes",
                    report.offset + at,
                    report.encoded_len
                ),
            }
        }
        Command::Dump {
            mesh_file,
            placement,
            format,
        } => {
            let bytes = read_mesh(&mesh_file)?;
            let mesh = decode_mesh_at(&bytes, placement.offset, placement.endian(), &limits)?;
            match format {
                DumpFormat::Json => {
                    let json = serde_json::to_string_pretty(&mesh).context("serialize json")?;
                    println!("{json}");
                }
                DumpFormat::Pretty => {
                    print!("{}", format_mesh_pretty(&mesh));
                }
            }
        }
    }
    Ok(())
}

fn read_mesh(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).with_context(|| format!("read mesh {}", path.display()))
}

struct MeshEntry {
    path: PathBuf,
    size: u64,
}

/// Lists the files of `dir` matching `pattern` (all files by default).
fn list_meshes(dir: &Path, pattern: Option<&str>) -> Result<Vec<MeshEntry>> {
    let pattern = dir.join(pattern.unwrap_or("*"));
    let pattern = pattern.to_str().context("directory path is not valid UTF-8")?;
    let mut entries = Vec::new();
    for path in glob::glob(pattern).context("invalid glob pattern")? {
        let path = path.context("list mesh directory")?;
        let metadata = fs::metadata(&path)?;
        if metadata.is_file() {
            entries.push(MeshEntry {
                path,
                size: metadata.len(),
            });
        }
    }
    Ok(entries)
}

fn print_inspect_report(report: &MeshReport) {
    println!(
        "tag: \"{}\" version: {} mesh_id: 0x{:08x}",
        report.type_tag, report.version, report.mesh_id
    );
    let bounds = report.bounds;
    println!(
        "grid: {}x{} bounds: x [{}, {}] y [{}, {}]",
        report.rows, report.cols, bounds.min_x, bounds.max_x, bounds.min_y, bounds.max_y
    );
    println!(
        "entity_radius: {} raster_precision: {}",
        report.entity_radius, report.raster_precision
    );
    println!("records:");
    println!("  occupied cells: {}", report.occupied_cells);
    println!("  floors: {}", report.floors);
    println!("  cell boundary half-edges: {}", report.cell_boundary_half_edges);
    println!("  mesh boundary edges: {}", report.mesh_boundary_edges);
    println!(
        "  contours: {} obstacle, {} walkable, {} oriented ({} points)",
        report.obstacle_contours,
        report.walkable_contours,
        report.oriented_contours,
        report.contour_points
    );
    println!(
        "  adjacency: {} groups, {} links",
        report.adjacency_groups, report.boundary_links
    );
    println!("encoded size: {} bytes", report.encoded_len);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_meshes_filters_and_skips_directories() {
        let dir = std::env::temp_dir().join(format!("navcodec-tools-list-{}", std::process::id()));
        fs::create_dir_all(dir.join("nested.nav")).unwrap();
        fs::write(dir.join("a.nav"), [0u8; 3]).unwrap();
        fs::write(dir.join("b.nav"), [0u8; 10]).unwrap();
        fs::write(dir.join("notes.txt"), b"x").unwrap();

        let mut entries = list_meshes(&dir, Some("*.nav")).unwrap();
        entries.sort_by_key(|entry| Reverse(entry.size));
        let names: Vec<_> = entries
            .iter()
            .map(|entry| entry.path.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, ["b.nav", "a.nav"]);
        assert_eq!(entries[0].size, 10);

        assert_eq!(list_meshes(&dir, None).unwrap().len(), 3);

        fs::remove_dir_all(&dir).unwrap();
    }
}
