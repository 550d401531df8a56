//! Container Recipe Compiler
//!
//! Renders the Dockerfile as an ordered list of text blocks. The node and
//! python branches are mutually exclusive; shared blocks are parameterized by
//! the resolved privileged user. All blocks that need root run contiguously
//! before the single USER drop near the end of the file, so the build never
//! bounces between privileged and unprivileged users.

use crate::compile::{FIREWALL_SCRIPT_NAME, FIREWALL_SCRIPT_PATH};
use crate::config::{DevcontainerConfig, NodePackageManager, Runtime};
use crate::policy::GenerationPolicy;

/// Base packages installed for every configuration.
const BASE_PACKAGES: &str = "less git procps sudo fzf zsh man-db unzip gnupg2 jq iproute2";

/// Packet-filter and DNS utilities the firewall script needs at runtime.
const FIREWALL_PACKAGES: &str = "iptables ipset dnsutils aggregate";

/// Developer tools installed on the python branch.
const PYTHON_TOOLS: &str = "black ruff mypy pytest";

/// Global package providing the assistant CLI.
const ASSISTANT_PACKAGE: &str = "@anthropic-ai/claude-code";

/// Compile the build recipe for a configuration.
pub fn compile(config: &DevcontainerConfig, policy: &GenerationPolicy) -> String {
    let user = policy.username;
    let mut blocks: Vec<String> = Vec::new();

    blocks.push(format!(
        "FROM {}\n\nARG TZ\nENV TZ=\"$TZ\"",
        config.runtime.base_image(&config.runtime_version)
    ));

    blocks.push(apt_block(config.enable_firewall));

    match config.runtime {
        Runtime::Node(NodePackageManager::Pnpm) => {
            blocks.push("RUN npm install -g pnpm".to_string());
        }
        Runtime::Node(NodePackageManager::Bun) => {
            blocks.push(
                "RUN curl -fsSL https://bun.sh/install | BUN_INSTALL=/usr/local bash".to_string(),
            );
        }
        Runtime::Python => {
            // The python base image ships without a non-root user.
            blocks.push(format!(
                "RUN useradd --create-home --shell /bin/zsh {}",
                user
            ));
            blocks.push(format!("RUN pip install --no-cache-dir {}", PYTHON_TOOLS));
        }
    }

    if config.assistant_mode.enabled() {
        if config.runtime == Runtime::Python {
            // Node runtime is only needed to host the assistant CLI package.
            blocks.push(
                "RUN curl -fsSL https://deb.nodesource.com/setup_20.x | bash - \\\n    \
                 && apt-get install -y --no-install-recommends nodejs \\\n    \
                 && apt-get clean && rm -rf /var/lib/apt/lists/*"
                    .to_string(),
            );
        }
        blocks.push(format!("RUN npm install -g {}", ASSISTANT_PACKAGE));
    }

    blocks.push(format!(
        "RUN mkdir -p /commandhistory \\\n    \
         && touch /commandhistory/.bash_history \\\n    \
         && chown -R {user}:{user} /commandhistory",
        user = user
    ));

    // Marker for tooling that wants to detect it is inside this container.
    blocks.push("ENV DEVCONTAINER=true".to_string());

    blocks.push(format!(
        "RUN mkdir -p /workspace && chown -R {user}:{user} /workspace\nWORKDIR /workspace",
        user = user
    ));

    if config.enable_firewall {
        blocks.push(firewall_bootstrap_block(user));
    }

    // Single privilege drop; everything below runs as the container user.
    blocks.push(format!("USER {}", user));

    blocks.push(shell_block());

    if config.assistant_mode.enabled() {
        blocks.push(
            "RUN echo 'alias cc=\"claude\"' >> ~/.zshrc \\\n    \
             && echo 'alias ccr=\"claude --resume\"' >> ~/.zshrc"
                .to_string(),
        );
    }

    let mut recipe = blocks.join("\n\n");
    recipe.push('\n');
    recipe
}

fn apt_block(enable_firewall: bool) -> String {
    let mut packages = BASE_PACKAGES.to_string();
    if enable_firewall {
        packages.push(' ');
        packages.push_str(FIREWALL_PACKAGES);
    }
    format!(
        "RUN apt-get update && apt-get install -y --no-install-recommends \\\n    {} \\\n    \
         && apt-get clean && rm -rf /var/lib/apt/lists/*",
        packages
    )
}

/// Copy the firewall script into the image and grant the container user
/// passwordless elevation for that one script only.
fn firewall_bootstrap_block(user: &str) -> String {
    format!(
        "COPY {script} {path}\nRUN chmod +x {path} \\\n    \
         && echo \"{user} ALL=(root) NOPASSWD: {path}\" > /etc/sudoers.d/{user}-firewall \\\n    \
         && chmod 0440 /etc/sudoers.d/{user}-firewall",
        script = FIREWALL_SCRIPT_NAME,
        path = FIREWALL_SCRIPT_PATH,
        user = user
    )
}

fn shell_block() -> String {
    "ENV SHELL=/bin/zsh\nENV EDITOR=vim\nENV VISUAL=vim\n\n\
     RUN sh -c \"$(curl -fsSL https://raw.githubusercontent.com/deluan/zsh-in-docker/master/zsh-in-docker.sh)\" -- \\\n    \
     -p git -p fzf \\\n    \
     -a \"export HISTFILE=/commandhistory/.bash_history\" \\\n    \
     -a \"export PROMPT_COMMAND='history -a'\""
        .to_string()
}
