//! Setup and configuration commands

use crate::config::{DecpPaths, Settings};
use crate::error::DecpResult;

/// Write the settings file with its defaults
pub fn handle_init_command(paths: &DecpPaths, settings: &Settings, force: bool) -> DecpResult<()> {
    let settings_file = paths.settings_file();
    if paths.is_initialized() && !force {
        println!("Settings file already exists: {}", settings_file.display());
        println!("Use --force to overwrite it.");
        return Ok(());
    }

    settings.save(paths)?;
    println!("Wrote settings to {}", settings_file.display());
    println!();
    println!("Edit the input paths, then run:");
    println!("  decp-budget budget      # civil-state procurement budget");
    println!("  decp-budget buyers      # buyer candidates to annotate");
    println!("  decp-budget contracts   # filtered contracts and monthly installments");
    Ok(())
}

/// Show resolved paths and filter constants
pub fn handle_config_command(paths: &DecpPaths, settings: &Settings) -> DecpResult<()> {
    let inputs = &settings.inputs;
    let outputs = &settings.outputs;

    println!("decp-budget Configuration");
    println!("=========================");
    println!("Base directory: {}", paths.base_dir().display());
    println!(
        "Settings file:  {}{}",
        paths.settings_file().display(),
        if paths.is_initialized() { "" } else { " (not found, using defaults)" }
    );
    println!();
    println!("Inputs:");
    println!("  Budget ledger:        {}", paths.resolve(&inputs.budget_ledger).display());
    println!("  Ministry reference:   {}", paths.resolve(&inputs.ministry_reference).display());
    println!("  Control accounts:     {}", paths.resolve(&inputs.control_accounts).display());
    println!("  Procurement register: {}", paths.resolve(&inputs.procurement_register).display());
    println!("  Buyer scope:          {}", paths.resolve(&inputs.buyer_scope).display());
    println!();
    println!("Outputs:");
    println!("  Budget:               {}", paths.resolve(&outputs.budget).display());
    println!("  Buyer candidates:     {}", paths.resolve(&outputs.buyer_candidates).display());
    println!("  Contracts:            {}", paths.resolve(&outputs.contracts).display());
    println!("  Installments:         {}", paths.resolve(&outputs.installments).display());
    println!();
    println!("Filters:");
    println!("  Excluded ministry:    {}", settings.budget.excluded_ministry);
    println!("  Budget accounts:      {:?}", settings.budget.budget_accounts);
    println!("  Source:               {}", settings.procurement.source);
    println!("  Contract type:        {}", settings.procurement.contract_type);
    println!("  Notified after:       {}", settings.procurement.notified_after);
    println!("  Scope flag:           {}", settings.procurement.scope_flag);
    println!("  Zero duration:        {:?}", settings.procurement.zero_duration);
    println!();
    println!(
        "Export: delimiter '{}', decimal separator '{}', {} decimals",
        settings.export.delimiter, settings.export.decimal_separator, settings.export.precision
    );
    Ok(())
}
