mod support;

use support::TestHome;

#[test]
fn config_window_changes_status() {
    let home = TestHome::new();
    home.add(&["Check water softener", "--due", "2024-06-20"]);

    let default = home.json(&["list"]);
    assert_eq!(default["data"]["tasks"][0]["status"], "upcoming");

    home.write_config("[status]\nupcoming_window_days = 5\n");
    let narrow = home.json(&["list"]);
    assert_eq!(narrow["data"]["tasks"][0]["status"], "scheduled");
}

#[test]
fn config_sets_default_sort_and_calendar_limit() {
    let home = TestHome::new();
    home.add(&["Zip tie cables", "--category", "Electrical", "--due", "2024-06-11"]);
    home.add(&["Aerate lawn", "--category", "Yard", "--due", "2024-06-11"]);

    home.write_config("[list]\ndefault_sort = \"name\"\n\n[calendar]\nmax_visible = 1\n");

    let list = home.json(&["list"]);
    assert_eq!(list["data"]["tasks"][0]["name"], "Aerate lawn");

    let calendar = home.json(&["calendar"]);
    let cell = calendar["data"]["cells"]
        .as_array()
        .expect("cells")
        .iter()
        .find(|cell| cell["day"] == 11)
        .cloned()
        .expect("day 11");
    assert_eq!(cell["tasks"].as_array().expect("tasks").len(), 1);
    assert_eq!(cell["overflow"], 1);
}

#[test]
fn invalid_config_falls_back_to_defaults() {
    let home = TestHome::new();
    home.add(&["Check water softener", "--due", "2024-06-20"]);
    home.write_config("[status]\nupcoming_window_days = -3\n");

    let envelope = home.json(&["list"]);
    assert_eq!(envelope["data"]["tasks"][0]["status"], "upcoming");
}

#[test]
fn config_can_point_at_the_store() {
    let home = TestHome::new();
    let store = home.path().join("elsewhere").join("house.json");
    home.write_config(&format!("store_path = {:?}\n", store.to_str().expect("utf8 path")));

    assert_cmd::Command::cargo_bin("homekeep")
        .expect("binary")
        .env_remove("HOMEKEEP_STORE")
        .env("HOMEKEEP_CONFIG", home.config_path())
        .env("HOMEKEEP_TODAY", support::TODAY)
        .args(["add", "Clean coils"])
        .assert()
        .success();

    assert!(store.exists());
    assert!(!home.store_path().exists());
}
