use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use chrono::Local;
use cutlist_model::{AnchoredImage, OutputSheet};
use cutlist_xlsx::write_output_sheet;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::classify::Classified;
use crate::relocate::relocate;
use crate::run::RunInfo;
use crate::PipelineError;

pub const SUMMARY_FILE_NAME: &str = "summary.txt";

/// Everything one run produced on disk.
#[derive(Clone, Debug)]
pub struct AssembledRun {
    pub archive_path: PathBuf,
    pub export_dir: PathBuf,
    /// Base names of all produced files, workbooks first, summary last.
    pub files: Vec<String>,
    pub file_paths: Vec<(String, PathBuf)>,
}

/// Write one workbook per classified group plus the run summary, then
/// package everything into a flat `{token}.zip` under `out_dir`.
///
/// Output files live under `out_dir/{token}/`; tokens are unique per run, so
/// concurrent runs never contend on paths. An archive failure is terminal:
/// already-written workbooks are left on disk but nothing references them.
pub fn assemble(
    info: &RunInfo,
    classified: &Classified,
    images: &[AnchoredImage],
    object_name_column: u32,
    remarks: &[String],
    out_dir: &Path,
) -> Result<AssembledRun, PipelineError> {
    let export_dir = out_dir.join(&info.token);
    fs::create_dir_all(&export_dir)?;

    let mut produced: Vec<(String, PathBuf)> = Vec::new();
    for group in &classified.groups {
        let sheet = OutputSheet {
            client_name: info.client_name.clone(),
            project_name: info.project_name.clone(),
            header: classified.header.clone(),
            rows: group.rows.clone(),
            object_name_column,
            images: relocate(images, &group.remap),
        };
        let file_name = output_file_name(
            &info.client_name,
            &info.project_name,
            &group.material_type.name,
        );
        let path = export_dir.join(&file_name);
        write_output_sheet(&sheet, &path)?;
        log::info!(
            "wrote {} ({} arena rows, {} images)",
            file_name,
            group.rows.len(),
            sheet.images.len()
        );
        produced.push((file_name, path));
    }

    let summary_path = export_dir.join(SUMMARY_FILE_NAME);
    fs::write(&summary_path, summary_text(info, remarks))?;
    produced.push((SUMMARY_FILE_NAME.to_string(), summary_path));

    let archive_path = out_dir.join(format!("{}.zip", info.token));
    write_archive(&archive_path, &produced)?;

    Ok(AssembledRun {
        archive_path,
        export_dir,
        files: produced.iter().map(|(name, _)| name.clone()).collect(),
        file_paths: produced,
    })
}

/// Flat archive: every file added by base name, no directories.
fn write_archive(
    archive_path: &Path,
    files: &[(String, PathBuf)],
) -> Result<(), PipelineError> {
    let mut archive = ZipWriter::new(File::create(archive_path)?);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    for (name, path) in files {
        archive.start_file(name.clone(), options)?;
        let mut source = File::open(path)?;
        io::copy(&mut source, &mut archive)?;
    }
    archive.finish()?;
    Ok(())
}

/// `{client}-{project}-{type}.xlsx`, slugified.
pub fn output_file_name(client: &str, project: &str, type_name: &str) -> String {
    format!("{}.xlsx", slugify(&format!("{client}-{project}-{type_name}")))
}

/// Lower-case ASCII slug: alphanumerics kept, every other run collapsed to a
/// single `-`, no leading/trailing separator.
pub fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    let mut pending_separator = false;
    for c in input.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_separator && !slug.is_empty() {
                slug.push('-');
            }
            pending_separator = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_separator = true;
        }
    }
    slug
}

fn summary_text(info: &RunInfo, remarks: &[String]) -> String {
    let mut lines = vec![
        format!("Client name: {}", info.client_name),
        format!("Project name: {}", info.project_name),
        format!("Source file name: {}", info.source_file_name),
        format!(
            "Generated at: {}",
            Local::now().format("%Y-%m-%d %H:%M:%S")
        ),
        format!("Author: {}", info.author),
        String::new(),
        "Remarks:".to_string(),
    ];
    if remarks.is_empty() {
        lines.push("- No remarks".to_string());
    } else {
        lines.extend(remarks.iter().map(|remark| format!("- {remark}")));
    }
    lines.join("\n")
}
