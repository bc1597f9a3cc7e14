use crate::FileSet;

/// Package manager inferred from which lockfile a project carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageManager {
  Npm,
  Pnpm,
  Yarn,
  Bun,
}

/// Lockfile name to manager, in detection priority order.
const LOCKFILES: &[(&str, PackageManager)] = &[
  ("bun.lockb", PackageManager::Bun),
  ("bun.lock", PackageManager::Bun),
  ("pnpm-lock.yaml", PackageManager::Pnpm),
  ("yarn.lock", PackageManager::Yarn),
  ("package-lock.json", PackageManager::Npm),
];

impl PackageManager {
  pub fn detect(files: &FileSet) -> Option<Self> {
    LOCKFILES.iter().find(|(path, _)| files.contains(path)).map(|(_, manager)| *manager)
  }

  pub fn name(self) -> &'static str {
    match self {
      Self::Npm => "npm",
      Self::Pnpm => "pnpm",
      Self::Yarn => "yarn",
      Self::Bun => "bun",
    }
  }

  /// The two commands a user would run locally to get a real dev server.
  pub fn install_command(self) -> &'static str {
    match self {
      Self::Npm => "npm install",
      Self::Pnpm => "pnpm install",
      Self::Yarn => "yarn install",
      Self::Bun => "bun install",
    }
  }

  pub fn dev_command(self) -> &'static str {
    match self {
      Self::Npm => "npm run dev",
      Self::Pnpm => "pnpm dev",
      Self::Yarn => "yarn dev",
      Self::Bun => "bun dev",
    }
  }
}

#[test]
fn detects_bun_from_binary_lockfile() {
  let files: FileSet =
    [("package.json", "{}"), ("bun.lockb", ""), ("yarn.lock", "")].into_iter().collect();
  assert_eq!(PackageManager::detect(&files), Some(PackageManager::Bun));
}

#[test]
fn no_lockfile_means_no_manager() {
  let files: FileSet = [("package.json", "{}")].into_iter().collect();
  assert_eq!(PackageManager::detect(&files), None);
}
