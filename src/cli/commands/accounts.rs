use anyhow::Result;

use super::Desk;
use crate::cli::Login;
use crate::config::ThesisDeskConfig;

pub struct ConfigCommand {
    config: ThesisDeskConfig,
}

impl ConfigCommand {
    pub fn new(config: ThesisDeskConfig) -> Self {
        Self { config }
    }

    pub fn execute(&self) -> Result<()> {
        print!("{}", self.config.to_toml()?);
        Ok(())
    }
}

pub struct ProfessorsCommand;

impl ProfessorsCommand {
    pub fn execute(&self, desk: &Desk) -> Result<()> {
        let professors = desk.accounts().list_professors()?;
        if professors.is_empty() {
            println!("📭 No professors registered. Run 'thesis-desk init' first.");
            return Ok(());
        }

        println!("👨‍🏫 PROFESSORS");
        println!("─────────────");
        for professor in professors {
            println!("{} - {} <{}>", professor.id, professor.name, professor.email);
            for course in &professor.courses {
                println!("   📚 {}: {}", course.course_id, course.title);
            }
            if let (Some(current), Some(max)) = (professor.current_supervise, professor.max_supervise) {
                println!("   👥 Supervising {current}/{max}");
            }
        }
        Ok(())
    }
}

pub struct PasswdCommand {
    pub login: Login,
    pub new_password: String,
    pub confirm: String,
}

impl PasswdCommand {
    pub fn execute(&self, desk: &Desk) -> Result<()> {
        let user = desk.accounts().change_password(
            &self.login.user,
            &self.login.password,
            &self.new_password,
            &self.confirm,
        )?;
        println!("🔑 Password changed for {}", user.id);
        Ok(())
    }
}
