//! Pack membership and dependency tracking.
//!
//! A pack targets one version and keeps, per member, whether it was added
//! manually and which other members depend on it. Adding a mod pulls in its
//! missing dependencies; removing is refused while anything depends on the
//! mod; [`Pack::autoremove`] sweeps dependencies nobody needs anymore.
//!
//! Every mutating operation validates first and persists afterwards, so a
//! failed check never leaves a modified pack file behind.

use crate::config::{Config, JsonConfig};
use crate::error::{Error, Result};
use crate::fs::{self, Materialization};
use crate::mods::Mod;
use crate::paths;
use crate::registry::ModRegistry;
use modlib_schema::{GameVersion, JAR, LINK, Membership, ModId, PackManifest};
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// A pack loaded from its file.
#[derive(Debug)]
pub struct Pack {
    path: PathBuf,
    manifest: PackManifest,
    materialization: Materialization,
    json: JsonConfig,
}

/// A mod scheduled to join the pack, with everything needed to do so.
#[derive(Debug)]
struct Step {
    id: ModId,
    dependencies: Vec<ModId>,
    source: PathBuf,
    dest: PathBuf,
}

/// What [`Pack::repair`] changed.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Repair {
    /// Dependencies that were missing and have been added.
    pub added: Vec<ModId>,
    /// `(dependency, dependant)` edges that were missing and are now recorded.
    pub linked: Vec<(ModId, ModId)>,
    /// `(member, dependant)` edges naming mods no longer in the pack.
    pub pruned: Vec<(ModId, ModId)>,
}

impl Repair {
    /// Nothing needed fixing.
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.linked.is_empty() && self.pruned.is_empty()
    }
}

impl Pack {
    /// Create a new, empty pack file named `name` in the packs directory.
    ///
    /// Both the packs directory and `directory` are created if missing;
    /// `directory` is stored as an absolute path.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PackExists`] if the file already exists, or an I/O
    /// error if directories or the file cannot be written.
    pub fn create(
        config: &Config,
        name: &str,
        directory: impl Into<PathBuf>,
        version: GameVersion,
    ) -> Result<Self> {
        let path = config.packs_dir().join(name);
        if fs::exists_or_dangling(&path) {
            return Err(Error::PackExists { path });
        }
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
        }

        let directory = directory.into();
        let directory = paths::absolute(&directory).map_err(|e| Error::io(&directory, e))?;
        let manifest = PackManifest::new(version, directory);
        std::fs::create_dir_all(&manifest.directory)
            .map_err(|e| Error::io(&manifest.directory, e))?;

        let pack = Self {
            path,
            manifest,
            materialization: config.materialization(),
            json: config.json,
        };
        pack.write()?;
        info!(
            "Created pack {} for {}",
            pack.path.display(),
            pack.manifest.version
        );
        Ok(pack)
    }

    /// Open an existing pack by path, or by name inside the packs directory.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PackNotFound`] if neither location holds a file, or
    /// an error if the file cannot be read.
    pub fn open(config: &Config, name: &str) -> Result<Self> {
        let given = PathBuf::from(name);
        let path = [given.clone(), config.packs_dir().join(&given)]
            .into_iter()
            .find(|p| p.is_file())
            .ok_or_else(|| Error::PackNotFound {
                name: name.to_string(),
            })?;
        Self::load(&path, config.materialization(), config.json)
    }

    /// Load the pack file at `path`.
    ///
    /// # Errors
    ///
    /// Returns an I/O or JSON error if the file cannot be read or parsed.
    pub fn load(path: &Path, materialization: Materialization, json: JsonConfig) -> Result<Self> {
        debug!("Loading pack {}", path.display());
        Ok(Self {
            path: path.to_path_buf(),
            manifest: fs::read_json(path)?,
            materialization,
            json,
        })
    }

    /// Location of the pack file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Target version.
    pub fn version(&self) -> &GameVersion {
        &self.manifest.version
    }

    /// Where member files are materialized.
    pub fn directory(&self) -> &Path {
        &self.manifest.directory
    }

    /// The full pack contents.
    pub fn manifest(&self) -> &PackManifest {
        &self.manifest
    }

    /// Membership table.
    pub fn mods(&self) -> &BTreeMap<ModId, Membership> {
        &self.manifest.mods
    }

    /// Path of `m`'s materialized file in the pack directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the mod has no `name` for the pack's version.
    pub fn member_file(&self, m: &Mod) -> Result<PathBuf> {
        let name = m.name(Some(&self.manifest.version))?;
        Ok(self.manifest.directory.join(format!("{name}.jar")))
    }

    /// Add a mod and any missing dependencies.
    ///
    /// Dependencies are added depth-first in declaration order, as
    /// non-manual members, each one recording `id` (or whichever member
    /// needs it) as a dependant. Re-adding a member only promotes it to
    /// manual when `manually` is set; its dependants are kept.
    ///
    /// The whole dependency closure is checked before anything is touched.
    /// Members are then materialized and persisted one at a time, deepest
    /// first, so an I/O failure leaves a pack file that matches what was
    /// materialized.
    ///
    /// # Errors
    ///
    /// Returns [`Error::VersionMismatch`] if the mod or a missing dependency
    /// has no file for the pack's version, [`Error::DependencyCycle`] if the
    /// missing dependencies form a cycle, [`Error::UnknownMod`] for ids not
    /// in storage, and I/O errors from materialization or persisting.
    pub fn add(&mut self, registry: &mut ModRegistry, id: &ModId, manually: bool) -> Result<()> {
        if let Some(member) = self.manifest.mods.get(id) {
            let version = &self.manifest.version;
            if !registry.get_or_load(id)?.publishes(version) {
                return Err(Error::VersionMismatch {
                    id: id.clone(),
                    version: version.clone(),
                });
            }
            if manually && !member.manually {
                if let Some(member) = self.manifest.mods.get_mut(id) {
                    member.manually = true;
                }
                info!("Marked {id} as manually added");
                self.write()?;
            } else {
                debug!("{id} is already in the pack");
            }
            return Ok(());
        }

        let steps = self.plan(registry, id)?;
        for step in steps {
            fs::materialize(&step.source, &step.dest, self.materialization)?;

            for dep in &step.dependencies {
                if let Some(member) = self.manifest.mods.get_mut(dep) {
                    member.dependants.insert(step.id.clone());
                }
            }
            let manual = manually && step.id == *id;
            info!(
                "Added {}{}",
                step.id,
                if manual { "" } else { " (dependency)" }
            );
            self.manifest.mods.insert(step.id, Membership::new(manual));
            self.write()?;
        }
        Ok(())
    }

    /// Work out, without side effects, which mods joining the pack `id`
    /// needs, deepest dependency first.
    fn plan(&self, registry: &mut ModRegistry, id: &ModId) -> Result<Vec<Step>> {
        let mut steps = Vec::new();
        let mut visiting = Vec::new();
        let mut visited = HashSet::new();
        self.plan_recursive(registry, id, &mut steps, &mut visiting, &mut visited)?;
        Ok(steps)
    }

    fn plan_recursive(
        &self,
        registry: &mut ModRegistry,
        id: &ModId,
        steps: &mut Vec<Step>,
        visiting: &mut Vec<ModId>,
        visited: &mut HashSet<ModId>,
    ) -> Result<()> {
        if visited.contains(id) {
            return Ok(());
        }

        if let Some(start) = visiting.iter().position(|v| v == id) {
            let mut chain = visiting[start..].to_vec();
            chain.push(id.clone());
            return Err(Error::DependencyCycle { chain });
        }

        let version = &self.manifest.version;
        let m = registry.get_or_load(id)?;
        if !m.publishes(version) {
            return Err(Error::VersionMismatch {
                id: id.clone(),
                version: version.clone(),
            });
        }
        let dependencies = m.dependencies(Some(version))?;
        let source = match self.materialization {
            Materialization::Symlink => m.file(LINK, Some(version))?,
            Materialization::Copy => m.file(JAR, Some(version))?,
        };
        let dest = self.member_file(m)?;

        visiting.push(id.clone());
        for dep in &dependencies {
            if !self.manifest.contains(dep) {
                self.plan_recursive(registry, dep, steps, visiting, visited)?;
            }
        }
        visiting.pop();

        visited.insert(id.clone());
        steps.push(Step {
            id: id.clone(),
            dependencies,
            source,
            dest,
        });
        Ok(())
    }

    /// Remove a member that nothing depends on.
    ///
    /// Does not cascade: dependencies stay in the pack (see
    /// [`autoremove`](Self::autoremove)). The member's file is deleted
    /// before the membership table changes, so a failed deletion leaves
    /// the pack as it was.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotInPack`] if `id` is not a member,
    /// [`Error::HasDependants`] if other members still need it, and I/O
    /// errors from deleting the file or persisting.
    pub fn remove(&mut self, registry: &mut ModRegistry, id: &ModId) -> Result<()> {
        let m = registry.get_or_load(id)?;
        let member = self
            .manifest
            .mods
            .get(id)
            .ok_or_else(|| Error::NotInPack { id: id.clone() })?;
        if !member.dependants.is_empty() {
            return Err(Error::HasDependants {
                id: id.clone(),
                dependants: member.dependants.iter().cloned().collect(),
            });
        }

        let dependencies = m.dependencies(Some(&self.manifest.version))?;
        let file = self.member_file(m)?;

        fs::remove(&file)?;

        for dep in &dependencies {
            if !self.manifest.contains(dep) {
                warn!("{id} depends on {dep}, which is not in the pack");
            }
        }
        // Sweep every member, not just current dependencies, so edges from
        // an older dependency list cannot pin a mod forever.
        for member in self.manifest.mods.values_mut() {
            member.dependants.remove(id);
        }
        self.manifest.mods.remove(id);

        info!("Removed {id}");
        self.write()
    }

    /// Repeatedly remove non-manual members without dependants until none
    /// are left. Returns the removed ids in removal order.
    ///
    /// Each pass collects its candidates before removing any of them; the
    /// pack is persisted after every removal.
    ///
    /// # Errors
    ///
    /// Propagates the first error from [`remove`](Self::remove); members
    /// removed before it stay removed.
    pub fn autoremove(&mut self, registry: &mut ModRegistry) -> Result<Vec<ModId>> {
        let mut removed = Vec::new();
        loop {
            let obsolete = self.manifest.obsolete();
            if obsolete.is_empty() {
                break;
            }
            debug!("Autoremove pass: {} obsolete", obsolete.len());
            for id in obsolete {
                self.remove(registry, &id)?;
                removed.push(id);
            }
        }
        Ok(removed)
    }

    /// `(dependant, dependency)` pairs where a member's dependency at the
    /// pack version is absent, or present without the member recorded as a
    /// dependant.
    ///
    /// # Errors
    ///
    /// Returns an error if a member cannot be loaded from storage.
    pub fn missing_dependencies(
        &self,
        registry: &mut ModRegistry,
    ) -> Result<Vec<(ModId, ModId)>> {
        let version = &self.manifest.version;
        let mut missing = Vec::new();
        for id in self.manifest.mods.keys() {
            for dep in registry.get_or_load(id)?.dependencies(Some(version))? {
                let recorded = self
                    .manifest
                    .mods
                    .get(&dep)
                    .is_some_and(|d| d.dependants.contains(id));
                if !recorded {
                    missing.push((id.clone(), dep));
                }
            }
        }
        Ok(missing)
    }

    /// Restore the dependency invariants of a pack whose file or mods changed
    /// behind its back.
    ///
    /// Adds missing dependencies as non-manual members, records missing
    /// dependant edges and drops dependants that are no longer members.
    ///
    /// # Errors
    ///
    /// Same as [`add`](Self::add); members added before a failure stay.
    pub fn repair(&mut self, registry: &mut ModRegistry) -> Result<Repair> {
        let mut report = Repair::default();

        for (dependant, dependency) in self.missing_dependencies(registry)? {
            if !self.manifest.contains(&dependency) {
                self.add(registry, &dependency, false)?;
                report.added.push(dependency.clone());
            }
            if let Some(member) = self.manifest.mods.get_mut(&dependency) {
                if member.dependants.insert(dependant.clone()) {
                    report.linked.push((dependency, dependant));
                }
            }
        }

        let members: HashSet<ModId> = self.manifest.mods.keys().cloned().collect();
        for (id, member) in &mut self.manifest.mods {
            member.dependants.retain(|d| {
                let keep = members.contains(d);
                if !keep {
                    report.pruned.push((id.clone(), d.clone()));
                }
                keep
            });
        }

        if !report.is_empty() {
            info!(
                "Repaired pack: {} added, {} linked, {} pruned",
                report.added.len(),
                report.linked.len(),
                report.pruned.len()
            );
        }
        self.write()?;
        Ok(report)
    }

    /// Persist the pack file atomically.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn write(&self) -> Result<()> {
        fs::write_json(&self.path, &self.manifest, self.json)
    }
}

/// Names of all pack files in the configured packs directory, sorted.
///
/// # Errors
///
/// Returns an error if the directory exists but cannot be listed.
pub fn list_packs(config: &Config) -> Result<Vec<String>> {
    let dir = config.packs_dir();
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(Error::io(dir, e)),
    };

    let mut names = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| Error::io(dir, e))?;
        if entry.path().is_file() {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    names.sort();
    Ok(names)
}
