//! Component 7 — the diagnostics / dump writer (§4.7, §6): renders an
//! allocator snapshot into the fixed-format human-readable dump and writes
//! it under the configured dump folder.
//!
//! This module never touches the allocator's lock itself — it is always
//! handed an already-taken `AllocatorSnapshot` and only formats and writes.

use std::path::Path;

use chrono::Local;

use crate::allocator::AllocatorSnapshot;
use crate::core::error::Result;

/// Renders `snapshot` into the dump format mandated by §6.
fn render(snapshot: &AllocatorSnapshot) -> String {
    let mut out = String::new();

    out.push_str("==== DUMP DE MEMORIA ====\n");
    for entry in &snapshot.descriptors {
        let d = &entry.descriptor;
        out.push_str(&format!(
            "ID: {} | Tipo: {} | Size: {} | RefCount: {} | Dirección: {:#010x} | Valor: {}\n",
            d.id,
            d.type_tag.as_wire(),
            d.size,
            d.refcount,
            d.offset,
            entry.value,
        ));
    }

    out.push_str("==== HUECOS DISPONIBLES (Free List) ====\n");
    for span in &snapshot.free_list {
        out.push_str(&format!("Offset: {} | Size: {}\n", span.offset, span.size));
    }

    let used: u64 = snapshot.descriptors.iter().map(|entry| entry.descriptor.size as u64).sum();
    let total = snapshot.arena_size as u64;
    let free = total.saturating_sub(used);
    let usage_pct = if total == 0 { 0.0 } else { (used as f64 / total as f64) * 100.0 };

    out.push_str("==== ESTADÍSTICAS DE MEMORIA ====\n");
    out.push_str(&format!("Total reservado: {} bytes\n", total));
    out.push_str(&format!("Memoria usada : {} bytes\n", used));
    out.push_str(&format!("Memoria libre : {} bytes\n", free));
    out.push_str(&format!("Uso (%)       : {:.2}%\n", usage_pct));

    out
}

/// `YYYY-MM-DD_HH-MM-SS-mmm` local time, per §6's dump file naming scheme.
fn timestamp() -> String {
    Local::now().format("%Y-%m-%d_%H-%M-%S-%3f").to_string()
}

fn write_dump(dump_folder: &Path, file_name: String, snapshot: &AllocatorSnapshot) -> Result<()> {
    std::fs::create_dir_all(dump_folder)?;
    std::fs::write(dump_folder.join(file_name), render(snapshot))?;
    Ok(())
}

/// Writes a write-triggered dump (`dump_<ts>.txt`), called after every
/// successful `Set` (§6).
pub fn write_set_dump(dump_folder: &Path, snapshot: &AllocatorSnapshot) -> Result<()> {
    write_dump(dump_folder, format!("dump_{}.txt", timestamp()), snapshot)
}

/// Writes a sweeper-triggered dump (`gc_dump_<ts>.txt`), called after every
/// sweep that reclaimed at least one region (§6).
pub fn write_sweep_dump(dump_folder: &Path, snapshot: &AllocatorSnapshot) -> Result<()> {
    write_dump(dump_folder, format!("gc_dump_{}.txt", timestamp()), snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::allocator::Allocator;
    use crate::types::TypeTag;

    #[test]
    fn set_dump_contains_sections_and_value() {
        let allocator = Allocator::new(1024);
        let id = allocator.allocate(TypeTag::Int32, 32).unwrap();
        allocator.write(id, "42").unwrap();

        let dir = tempfile::tempdir().unwrap();
        write_set_dump(dir.path(), &allocator.snapshot()).unwrap();

        let files: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(files.len(), 1);
        let contents = std::fs::read_to_string(files[0].as_ref().unwrap().path()).unwrap();
        assert!(contents.starts_with("==== DUMP DE MEMORIA ===="));
        assert!(contents.contains("Valor: 42"));
        assert!(contents.contains("==== HUECOS DISPONIBLES (Free List) ===="));
        assert!(contents.contains("==== ESTADÍSTICAS DE MEMORIA ===="));

        let file_name = files[0].as_ref().unwrap().file_name().into_string().unwrap();
        assert!(file_name.starts_with("dump_") && file_name.ends_with(".txt"));
    }

    #[test]
    fn sweep_dump_uses_gc_prefix() {
        let allocator = Allocator::new(1024);
        let dir = tempfile::tempdir().unwrap();
        write_sweep_dump(dir.path(), &allocator.snapshot()).unwrap();

        let files: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        let file_name = files[0].as_ref().unwrap().file_name().into_string().unwrap();
        assert!(file_name.starts_with("gc_dump_") && file_name.ends_with(".txt"));
    }
}
