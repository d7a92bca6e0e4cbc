use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api::{self, download_url};
use crate::components::er_diagram::{AnalysisResponse, ErDiagramCanvas, Relationship};

#[component]
fn RelationshipRow(rel: Relationship) -> impl IntoView {
	let fk = rel.is_potential_fk;
	let pk = rel.targets_primary_key();
	view! {
		<tr>
			<td>{rel.source_table}</td>
			<td>
				{rel.source_field}
				<Show when=move || fk>
					<span class="badge badge-fk">"FK"</span>
				</Show>
			</td>
			<td>{rel.target_table}</td>
			<td>
				{rel.target_field}
				<Show when=move || pk>
					<span class="badge badge-pk">"PK"</span>
				</Show>
			</td>
			<td>{rel.source_file.unwrap_or_default()}</td>
		</tr>
	}
}

#[component]
fn AnalysisResults(response: AnalysisResponse) -> impl IntoView {
	let files = response.files.available();
	let links = files
		.into_iter()
		.map(|(label, file)| {
			view! {
				<li>
					<a href=download_url(file) download=file.to_string()>{label}</a>
				</li>
			}
		})
		.collect_view();
	let rows = response
		.relationships
		.into_iter()
		.map(|rel| view! { <RelationshipRow rel /> })
		.collect_view();

	view! {
		<section class="results">
			<p class="message">{response.message}</p>
			<h2>"Relationships"</h2>
			<table class="relationships">
				<thead>
					<tr>
						<th>"Source Table"</th>
						<th>"Source Field"</th>
						<th>"Target Table"</th>
						<th>"Target Field"</th>
						<th>"Source File"</th>
					</tr>
				</thead>
				<tbody>{rows}</tbody>
			</table>
			<h2>"Diagram Source"</h2>
			<pre class="diagram-text">{response.diagram}</pre>
			<h2>"Downloads"</h2>
			<ul class="downloads">{links}</ul>
		</section>
	}
}

/// Analysis form, ER diagram and results.
#[component]
pub fn Home() -> impl IntoView {
	let (path, set_path) = signal(String::new());
	let (loading, set_loading) = signal(false);
	let (response, set_response) = signal(None::<AnalysisResponse>);
	let (error, set_error) = signal(None::<String>);

	let relationships = Signal::derive(move || {
		response
			.get()
			.map(|r| r.relationships)
			.unwrap_or_default()
	});

	let on_submit = move |ev: leptos::ev::SubmitEvent| {
		ev.prevent_default();
		let directory = path.get_untracked().trim().to_string();
		if directory.is_empty() {
			set_error.set(Some("Please enter a directory path.".into()));
			return;
		}
		set_loading.set(true);
		set_error.set(None);
		spawn_local(async move {
			match api::analyze(&directory).await {
				Ok(r) => set_response.set(Some(r)),
				Err(err) => {
					set_response.set(None);
					set_error.set(Some(err.to_string()));
				}
			}
			set_loading.set(false);
		});
	};

	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"Uh oh! Something went wrong!"</h1>

				<p>"Errors: "</p>
				<ul>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>
			<main class="analyzer">
				<h1>"ER Diagram Analyzer"</h1>
				<form on:submit=on_submit>
					<input
						type="text"
						placeholder="Path to a directory of mapper files"
						prop:value=path
						on:input=move |ev| set_path.set(event_target_value(&ev))
					/>
					<button type="submit" disabled=loading>
						{move || if loading.get() { "Analyzing..." } else { "Analyze" }}
					</button>
				</form>
				<Show when=move || error.get().is_some()>
					<p class="error">{move || error.get().unwrap_or_default()}</p>
				</Show>

				<ErDiagramCanvas relationships />

				{move || response.get().map(|response| view! { <AnalysisResults response /> })}
			</main>
		</ErrorBoundary>
	}
}
