//! The command-line renderer for the Tessera Templating Engine.
// Copyright (C) 2024  Frankie Baffa
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

use {
    clap::Parser as ClapParser,
    log::{
        debug,
        LevelFilter,
    },
    std::path::PathBuf,
    tessera_core::{
        Options,
        Parser,
        Result,
        Value,
    },
};

/// Render an HTML template to standard output.
#[derive(ClapParser, Debug)]
#[command(name = "tessc", version, about, long_about = None)]
struct Cli {
    /// The template to render.
    template: PathBuf,

    /// A JSON file holding the data the template is rendered with.
    #[arg(long)]
    data: Option<PathBuf>,

    /// A layout template the rendered template is included into as
    /// `content`.
    #[arg(long)]
    container: Option<PathBuf>,

    /// A JSON file holding parser options.
    #[arg(long)]
    options: Option<PathBuf>,

    /// Extract literal runs.
    #[arg(long)]
    literal: bool,

    /// Copy the template without evaluating expressions.
    #[arg(long)]
    raw: bool,

    /// The application root for `/` includes and asset URLs.
    #[arg(long)]
    app_dir: Option<PathBuf>,

    /// Print the collected head links after the markup.
    #[arg(long)]
    dependencies: bool,

    /// Log parser events.
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        LevelFilter::Debug
    }
    else {
        LevelFilter::Warn
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
    debug!("{:?}", cli);

    let mut options = match &cli.options {
        Some(path) => Options::read(path)?,
        None => Options::default(),
    };
    if cli.literal {
        options.do_literal = true;
    }
    if cli.raw {
        options.do_expression = false;
    }
    if let Some(app_dir) = cli.app_dir {
        options.app_dir = app_dir;
    }

    let data = match &cli.data {
        Some(path) => Value::read(path)?,
        None => Value::object(Vec::<(String, Value)>::new()),
    };

    let mut parser = Parser::new(data);
    parser.set_options(options);
    if cli.verbose {
        parser.debug_events();
    }

    let output = parser.parse_file(&cli.template, cli.container.as_ref())?;
    println!("{output}");

    if cli.dependencies {
        for link in parser.head_links() {
            println!("{link}");
        }
    }

    Ok(())
}
