//! OSRM dataset preparation for container-backed tests.
//!
//! Downloads a Geofabrik extract once and runs the MLD pipeline through the
//! `osrm/osrm-backend` image. Results are cached under `OSRM_DATA_DIR`.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Geofabrik region path used for routing tests.
pub const REGION: &str = "europe/monaco";

/// Profile baked into the prepared dataset.
pub const PROFILE: &str = "foot";

#[derive(Debug)]
pub struct PreparedRegion {
    pub data_dir: PathBuf,
    /// Container-side path of the `.osrm` base file.
    pub container_osrm: String,
}

pub fn prepare(data_root: impl AsRef<Path>) -> io::Result<PreparedRegion> {
    let name = REGION.rsplit('/').next().unwrap_or(REGION);
    let data_dir = std::env::current_dir()?.join(data_root).join(name);
    fs::create_dir_all(&data_dir)?;

    let pbf = format!("{}-latest.osm.pbf", name);
    let osrm = format!("{}-latest.osrm", name);

    if !data_dir.join(&pbf).exists() {
        let url = format!("https://download.geofabrik.de/{}-latest.osm.pbf", REGION);
        let bytes = reqwest::blocking::get(url)
            .and_then(|resp| resp.error_for_status())
            .and_then(|resp| resp.bytes())
            .map_err(io::Error::other)?;
        let partial = data_dir.join(format!("{}.part", pbf));
        fs::write(&partial, &bytes)?;
        fs::rename(partial, data_dir.join(&pbf))?;
    }

    let steps: [(&str, Vec<String>, &str); 3] = [
        (
            "osrm-extract",
            vec!["-p".into(), format!("/opt/{}.lua", PROFILE), format!("/data/{}", pbf)],
            "",
        ),
        ("osrm-partition", vec![format!("/data/{}", osrm)], "partition"),
        ("osrm-customize", vec![format!("/data/{}", osrm)], "mldgr"),
    ];

    for (tool, args, marker) in steps {
        let output = if marker.is_empty() {
            data_dir.join(&osrm)
        } else {
            data_dir.join(format!("{}.{}", osrm, marker))
        };
        if output.exists() {
            continue;
        }
        let status = Command::new("docker")
            .args(["run", "--rm", "-v"])
            .arg(format!("{}:/data", data_dir.display()))
            .arg("osrm/osrm-backend")
            .arg(tool)
            .args(&args)
            .status()?;
        if !status.success() {
            return Err(io::Error::other(format!("{} exited with {}", tool, status)));
        }
    }

    Ok(PreparedRegion {
        data_dir,
        container_osrm: format!("/data/{}", osrm),
    })
}
