#![allow(dead_code)]

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use agro_etl::config::EtlConfig;
use tempfile::{TempDir, tempdir};

/// One small source file per dataset, with the messy labels and gaps the
/// real extracts have.
pub const SOURCES: [(&str, &str); 10] = [
    (
        "1_unidades_riego.csv",
        "Entidad,Municipio,Porcentaje Riego\n jalisco ,Zapopan,45.5\nSonora,Cajeme,\n",
    ),
    (
        "2_produccion_cielo_abierto.csv",
        "Entidad ,Cultivo,Superficie Cultivada,Produccion_Ton\nJalisco,maíz,100,50\nSonora,Trigo,,30\n",
    ),
    (
        "3_modalidad_hidrica.csv",
        "Entidad,Cultivo,Superficie Cultivada,Produccion,Modalidad\nColima,Limon,20,80,Riego\nColima,Mango,,,Temporal\n",
    ),
    (
        "4_ciclo_oi.csv",
        "Entidad,Cultivo,Superficie,Produccion\nJalisco,Agave,10,40\nSonora,Trigo,,12\nColima,Limon,0,5\n",
    ),
    (
        "5_ciclo_pv.csv",
        "Entidad,Cultivo,Superficie,Produccion\nSinaloa,Frijol,4,6\n",
    ),
    (
        "6_perennes.csv",
        "Entidad,Cultivo,Superficie\nJalisco,Agave,\nNayarit,Cafe,3.5\n",
    ),
    (
        "7_uso_suelo.csv",
        "Entidad,Uso de Suelo,Hectareas\nyucatan,Agricola,1200\n",
    ),
    (
        "8_instalaciones.csv",
        "Entidad,Municipio,Invernaderos\nQueretaro,Colon,14\n",
    ),
    (
        "9_uso_suelo_upa.csv",
        "Entidad,Municipio,Superficie UPA (ha)\nChiapas,Tapachula,NA\n",
    ),
    (
        "10_tecnologia_agricola.csv",
        "Entidad,Municipio,Tecnologia,Porcentaje\njalisco,zapopan,Riego por goteo,12.5\n",
    ),
];

/// Resolves a checked-in fixture under `tests/data`.
pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("data")
        .join(name)
}

/// Scratch directory helper that cleans up files automatically on drop.
pub struct TestWorkspace {
    temp_dir: TempDir,
}

impl TestWorkspace {
    /// Creates a fresh scratch directory for the current test case.
    pub fn new() -> Self {
        Self {
            temp_dir: tempdir().expect("temp dir"),
        }
    }

    /// Returns the root path for all files owned by this workspace.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn raw_dir(&self) -> PathBuf {
        self.path().join("data").join("raw")
    }

    pub fn clean_dir(&self) -> PathBuf {
        self.path().join("data").join("clean")
    }

    /// Writes `contents` into a file under the workspace and returns the path.
    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create parent dirs");
        }
        let mut file = File::create(&path).expect("create temp file");
        file.write_all(contents.as_bytes())
            .expect("write temp file contents");
        path
    }

    /// Writes a file into the raw-data directory.
    pub fn write_raw(&self, name: &str, contents: &str) -> PathBuf {
        self.write(&format!("data/raw/{name}"), contents)
    }

    /// Writes every dataset's source file into the raw-data directory.
    pub fn write_all_sources(&self) {
        for (name, contents) in SOURCES {
            self.write_raw(name, contents);
        }
    }

    /// Configuration pointing at this workspace with an in-memory store.
    pub fn config(&self) -> EtlConfig {
        EtlConfig {
            raw_dir: self.raw_dir(),
            clean_dir: self.clean_dir(),
            database: "sqlite::memory:".to_string(),
        }
    }
}
