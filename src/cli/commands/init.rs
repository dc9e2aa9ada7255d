use anyhow::Result;
use std::fs;

use super::Desk;

/// Create the storage layout and seed the demo roster
///
/// Safe to re-run: existing collections are left untouched and users are
/// only seeded when the users collection is empty.
pub struct InitCommand {
    pub seed: bool,
}

impl InitCommand {
    pub fn new() -> Self {
        Self { seed: true }
    }

    pub fn without_seed(mut self) -> Self {
        self.seed = false;
        self
    }

    pub fn execute(&self, desk: &Desk) -> Result<()> {
        println!("🚀 THESIS DESK INIT");
        println!("===================");
        println!();

        let storage = &desk.config().storage;
        fs::create_dir_all(storage.files_dir())?;
        println!("📁 Records:   {}", storage.data_dir().display());
        println!("📁 Documents: {}", storage.files_dir().display());

        if !self.seed {
            println!("⏭️  Skipping demo users");
            return Ok(());
        }

        match desk.accounts().seed_demo_users()? {
            0 => println!("👥 Users already present, nothing seeded"),
            count => {
                println!("👥 Seeded {count} demo users");
                println!("   🎓 Students:   S1001, S1002 (password: student123)");
                println!("   👨‍🏫 Professors: P2001, P2002 (password: prof123)");
            }
        }

        println!();
        println!("✅ Ready. Try 'thesis-desk professors' next.");
        Ok(())
    }
}

impl Default for InitCommand {
    fn default() -> Self {
        Self::new()
    }
}
