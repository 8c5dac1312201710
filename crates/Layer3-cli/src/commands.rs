//! Subcommand handlers - one line of output per resource

use futures::TryStreamExt;
use std::time::Duration;
use unify_client::{
    Client, DatasetApi, DatasetCollectionApi, OperationApi, OperationOptions, ProjectApi,
    ProjectCollectionApi, Resource,
};

pub async fn list_projects(client: &Client) -> anyhow::Result<()> {
    let projects = client.projects();
    let mut stream = projects.stream();
    while let Some(project) = stream.try_next().await? {
        println!(
            "{}\t{}\t{}",
            project.resource_id(),
            project.project_type().unwrap_or("-"),
            project.name().unwrap_or("-")
        );
    }
    Ok(())
}

pub async fn list_datasets(client: &Client) -> anyhow::Result<()> {
    let datasets = client.datasets();
    let mut stream = datasets.stream();
    while let Some(dataset) = stream.try_next().await? {
        println!(
            "{}\t{}\t{}",
            dataset.resource_id(),
            dataset.version().unwrap_or("-"),
            dataset.name().unwrap_or("-")
        );
    }
    Ok(())
}

pub async fn refresh_dataset(
    client: &Client,
    dataset_id: &str,
    asynchronous: bool,
    timeout: Option<u64>,
) -> anyhow::Result<()> {
    let dataset = client.datasets().by_resource_id(dataset_id).await?;

    let mut options = if asynchronous {
        OperationOptions::asynchronous()
    } else {
        OperationOptions::default()
    };
    if let Some(secs) = timeout {
        options = options.with_timeout(Duration::from_secs(secs));
    }

    let op = dataset.refresh(&options).await?;
    print_operation(op.as_ref());

    if !asynchronous && !op.succeeded() {
        anyhow::bail!("Refresh of dataset {} ended in {}", dataset_id, op.state());
    }
    Ok(())
}

pub async fn show_operation(client: &Client, id: &str) -> anyhow::Result<()> {
    let op = client.operation(id).await?;
    print_operation(op.as_ref());
    Ok(())
}

fn print_operation(op: &dyn OperationApi) {
    println!(
        "{}\t{}\t{}",
        op.id(),
        op.state(),
        op.description().unwrap_or("-")
    );
}
