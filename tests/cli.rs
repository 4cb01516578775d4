//! End-to-end tests of the decp-budget binary

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const REGISTER_HEADER: &str = "source;type;natureObjetMarche;objetMarche;codeCPV_Original;codeCPV;codeCPV_division;referenceCPV;dateNotification;anneeNotification;moisNotification;datePublicationDonnees;dureeMois;dureeMoisEstimee;dureeMoisCalculee;montant;nombreTitulaireSurMarchePresume;montantCalcule;formePrix;nature;accord-cadrePresume;procedure;idAcheteur;sirenAcheteurValide;nomAcheteur;libelleRegionAcheteur;libelleDepartementAcheteur;codePostalAcheteur;libelleCommuneAcheteur";

fn register_line(source: &str, kind: &str, notified: &str, duration: &str, amount: &str, buyer: &str, name: &str) -> String {
    format!(
        "{source};{kind};Services;Nettoyage des locaux;90910000;90910000;90;Nettoyage;{notified};2019;3;2019-04-01;{duration};{duration};{duration};{amount};1;{amount};Ferme;Marché;non;Appel d'offres ouvert;{buyer};True;{name};Île-de-France;Paris;75001;Paris"
    )
}

fn write_sources(base: &Path) {
    let register = [
        register_line("data.gouv.fr_aife", "Marché", "2019-03-15", "2", "300.00", "13000545700010", "Ministère de la Culture"),
        register_line("data.gouv.fr_aife", "Marché", "2018-01-01", "6", "600.00", "13000545700010", "Ministère de la Culture"),
        register_line("data.gouv.fr_aife", "Marché", "2019-06-01", "3", "900.00", "11000201100044", "Ministère de la Justice"),
        register_line("data.gouv.fr_pes", "Marché", "2019-03-15", "2", "300.00", "21750001600019", "Ville de Paris"),
    ];
    fs::write(
        base.join("register.csv"),
        format!("{}\n{}\n", REGISTER_HEADER, register.join("\n")),
    )
    .unwrap();

    fs::write(
        base.join("scope.csv"),
        "idAcheteur;nomAcheteur;OKKO\n\
         13000545700010;Ministère de la Culture;OK\n\
         11000201100044;Ministère de la Justice;KO\n",
    )
    .unwrap();

    fs::write(
        base.join("ledger.csv"),
        "Compte budgétaire;Compte général;Référentiel de programmation;EUR\n\
         31;6061000;0175-01;1 500,25\n\
         31;6061000;0212-02;800,00\n\
         21;6061000;0175-01;10,00\n",
    )
    .unwrap();
    fs::write(
        base.join("ministries.csv"),
        "ID_Activite;Ministere\n0175-01;Culture\n0212-02;Armées\n",
    )
    .unwrap();
    fs::write(base.join("accounts.csv"), "Compte;Libellé\n6061000;Fournitures\n").unwrap();

    fs::write(
        base.join("decp-budget.json"),
        r#"{
  "inputs": {
    "budget_ledger": "ledger.csv",
    "ministry_reference": "ministries.csv",
    "control_accounts": "accounts.csv",
    "procurement_register": "register.csv",
    "buyer_scope": "scope.csv"
  },
  "outputs": {
    "budget": "out/budget.csv",
    "buyer_candidates": "out/buyers.csv",
    "contracts": "out/contracts.csv",
    "installments": "out/mensualite.csv"
  }
}"#,
    )
    .unwrap();
}

fn decp(base: &Path) -> Command {
    let mut cmd = Command::cargo_bin("decp-budget").unwrap();
    cmd.env_remove("DECP_BUDGET_HOME")
        .env_remove("RUST_LOG")
        .arg("--base-dir")
        .arg(base);
    cmd
}

#[test]
fn test_budget_command() {
    let temp_dir = TempDir::new().unwrap();
    write_sources(temp_dir.path());

    decp(temp_dir.path())
        .arg("budget")
        .assert()
        .success()
        .stdout(predicate::str::contains("keep budget accounts"));

    let output = fs::read_to_string(temp_dir.path().join("out/budget.csv")).unwrap();
    assert_eq!(
        output,
        "Compte budgétaire;Compte général;ID_Activite;EUR;Ministere;Libellé\n\
         31;6061000;0175-01;1500,250;Culture;Fournitures\n"
    );
}

#[test]
fn test_buyers_command() {
    let temp_dir = TempDir::new().unwrap();
    write_sources(temp_dir.path());

    decp(temp_dir.path()).arg("buyers").assert().success();

    let output = fs::read_to_string(temp_dir.path().join("out/buyers.csv")).unwrap();
    let lines: Vec<_> = output.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[1].starts_with("11000201100044;Ministère de la Justice;"));
    assert!(lines[2].starts_with("13000545700010;Ministère de la Culture;"));
    assert!(lines[2].ends_with(";2;"));
    assert!(!output.contains("Ville de Paris"));
}

#[test]
fn test_contracts_command() {
    let temp_dir = TempDir::new().unwrap();
    write_sources(temp_dir.path());

    decp(temp_dir.path())
        .args(["contracts", "--report", "out/run.yaml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("join installments"));

    let contracts = fs::read_to_string(temp_dir.path().join("out/contracts.csv")).unwrap();
    assert_eq!(contracts.lines().count(), 2);

    let installments = fs::read_to_string(temp_dir.path().join("out/mensualite.csv")).unwrap();
    let months: Vec<_> = installments
        .lines()
        .skip(1)
        .map(|line| line.rsplit(';').next().unwrap())
        .collect();
    assert_eq!(months, vec!["2019-03-15", "2019-04-15", "2019-05-15"]);
    assert!(installments
        .lines()
        .skip(1)
        .all(|line| line.contains(";2019-05-15;150,000;1;")));

    let report = fs::read_to_string(temp_dir.path().join("out/run.yaml")).unwrap();
    assert!(report.contains("pipeline: contracts"));
}

#[test]
fn test_missing_input_fails_with_stage() {
    let temp_dir = TempDir::new().unwrap();

    decp(temp_dir.path())
        .arg("contracts")
        .assert()
        .failure()
        .stderr(predicate::str::contains("load procurement register"));

    assert!(!temp_dir.path().join("data/decp-budget_clean/mensualite.csv").exists());
}

#[test]
fn test_init_and_config() {
    let temp_dir = TempDir::new().unwrap();

    decp(temp_dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote settings"));
    assert!(temp_dir.path().join("decp-budget.json").exists());

    decp(temp_dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));

    decp(temp_dir.path())
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("Armées"))
        .stdout(predicate::str::contains("data.gouv.fr_aife"));
}
